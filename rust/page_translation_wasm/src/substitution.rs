// Static text substitution for elements carrying the translatable marker.
//
// Originals are captured onto the element once, before the first write, and
// every later pass reads them from there. Planning a set of writes is pure;
// `apply_writes` is the only step that touches the document.

use crate::config::DomConfig;
use crate::document::PageDocument;

/// Where an element's translatable text lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSlot {
    Placeholder,
    Value,
    TextContent,
}

#[derive(Clone, Debug)]
pub struct TranslatableRecord<E> {
    pub element: E,
    pub slot: TextSlot,
    pub original: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedWrite {
    pub record: usize,
    pub slot: TextSlot,
    pub text: String,
}

/// One slot per element. An input with a placeholder keeps its value untouched even when non-empty.
pub fn slot_for<D: PageDocument>(doc: &D, element: &D::Element) -> TextSlot {
    if !doc.is_input_like(element) {
        TextSlot::TextContent
    } else if doc.attribute(element, "placeholder").is_some() {
        TextSlot::Placeholder
    } else {
        TextSlot::Value
    }
}

fn read_slot<D: PageDocument>(doc: &D, element: &D::Element, slot: TextSlot) -> String {
    match slot {
        TextSlot::Placeholder => doc.attribute(element, "placeholder").unwrap_or_default(),
        TextSlot::Value => doc.form_value(element).unwrap_or_default(),
        TextSlot::TextContent => doc.text_content(element),
    }
}

fn write_slot<D: PageDocument>(doc: &D, element: &D::Element, slot: TextSlot, text: &str) {
    match slot {
        TextSlot::Placeholder => doc.set_attribute(element, "placeholder", text),
        TextSlot::Value => doc.set_form_value(element, text),
        TextSlot::TextContent => doc.set_text_content(element, text),
    }
}

/// Every marked element with its original text, capturing it first if this is the first visit.
pub fn collect_records<D: PageDocument>(
    doc: &D,
    dom: &DomConfig,
) -> Vec<TranslatableRecord<D::Element>> {
    doc.select_all(&dom.translatable_selector)
        .into_iter()
        .map(|element| {
            let slot = slot_for(doc, &element);
            let original = match doc.attribute(&element, &dom.original_text_attr) {
                Some(captured) => captured,
                None => {
                    let current = read_slot(doc, &element, slot);
                    doc.set_attribute(&element, &dom.original_text_attr, &current);
                    current
                }
            };
            TranslatableRecord {
                element,
                slot,
                original,
            }
        })
        .collect()
}

/// Marked elements that already have a captured original. Never captures.
pub fn captured_records<D: PageDocument>(
    doc: &D,
    dom: &DomConfig,
) -> Vec<TranslatableRecord<D::Element>> {
    doc.select_all(&dom.translatable_selector)
        .into_iter()
        .filter_map(|element| {
            let original = doc.attribute(&element, &dom.original_text_attr)?;
            let slot = slot_for(doc, &element);
            Some(TranslatableRecord {
                element,
                slot,
                original,
            })
        })
        .collect()
}

pub fn originals<E>(records: &[TranslatableRecord<E>]) -> Vec<String> {
    records.iter().map(|r| r.original.clone()).collect()
}

/// Pairs each slot with its text by position. Extra entries on either side are dropped.
pub fn plan_writes(slots: &[TextSlot], texts: &[String]) -> Vec<PlannedWrite> {
    slots
        .iter()
        .zip(texts)
        .enumerate()
        .map(|(record, (slot, text))| PlannedWrite {
            record,
            slot: *slot,
            text: text.clone(),
        })
        .collect()
}

pub fn slots<E>(records: &[TranslatableRecord<E>]) -> Vec<TextSlot> {
    records.iter().map(|r| r.slot).collect()
}

pub fn apply_writes<D: PageDocument>(
    doc: &D,
    records: &[TranslatableRecord<D::Element>],
    writes: &[PlannedWrite],
) {
    for write in writes {
        if let Some(record) = records.get(write.record) {
            write_slot(doc, &record.element, write.slot, &write.text);
        }
    }
}

/// Writes every captured original back. Safe to repeat.
pub fn restore_originals<D: PageDocument>(doc: &D, dom: &DomConfig) -> usize {
    let records = captured_records(doc, dom);
    let writes = plan_writes(&slots(&records), &originals(&records));
    apply_writes(doc, &records, &writes);
    records.len()
}
