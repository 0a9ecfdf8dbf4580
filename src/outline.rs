use pdf_writer::{Finish, Name, Pdf, TextStr};

use crate::refs::{ObjectReferences, RefType};

/// The document outline: one bookmark per section
#[derive(Default, Debug, Clone)]
pub struct Outline {
    pub entries: Vec<OutlineEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub page_index: usize,
    pub title: String,
}

impl Outline {
    pub fn add_bookmark(&mut self, page_index: usize, title: String) {
        self.entries.push(OutlineEntry { page_index, title });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the outline tree. Bookmarks whose page was never written are
    /// left out. Returns [None] when there is nothing to write.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        writer: &mut Pdf,
    ) -> Option<pdf_writer::Ref> {
        if self.is_empty() {
            return None;
        }

        let resolved: Vec<(&OutlineEntry, pdf_writer::Ref)> = self
            .entries
            .iter()
            .filter_map(|entry| match refs.get(RefType::Page(entry.page_index)) {
                Some(page_ref) => Some((entry, page_ref)),
                None => {
                    log::warn!(
                        "bookmark {:?} points at missing page {}",
                        entry.title,
                        entry.page_index
                    );
                    None
                }
            })
            .collect();
        if resolved.is_empty() {
            return None;
        }

        // generate IDs for everything
        let outlines_id = refs.gen(RefType::Outlines);
        let item_ids: Vec<_> = (0..resolved.len())
            .map(|i| refs.gen(RefType::OutlineEntry(i)))
            .collect();

        // write the root outline
        let mut outline = writer.outline(outlines_id);
        outline.first(item_ids[0]);
        outline.last(item_ids[item_ids.len() - 1]);
        outline.count(resolved.len() as i32);
        outline.finish();

        // write all our items
        for (i, (entry, page_ref)) in resolved.into_iter().enumerate() {
            let mut item = writer.outline_item(item_ids[i]);
            item.parent(outlines_id);
            item.title(TextStr(entry.title.as_str()));
            if i > 0 {
                item.prev(item_ids[i - 1]);
            }
            if i + 1 < item_ids.len() {
                item.next(item_ids[i + 1]);
            }

            // fit the whole page into view when navigating to the bookmark
            let mut dest = item.insert(Name(b"Dest")).array();
            dest.item(page_ref);
            dest.item(Name(b"Fit"));
            dest.finish();
        }

        Some(outlines_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(outline: &Outline, pages: usize) -> (ObjectReferences, String) {
        let mut refs = ObjectReferences::new();
        for i in 0..pages {
            refs.gen(RefType::Page(i));
        }
        let mut writer = Pdf::new();
        outline.write(&mut refs, &mut writer);
        let bytes = writer.finish();
        (refs, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[test]
    fn empty_outline_writes_nothing() {
        let (refs, _) = render(&Outline::default(), 1);
        assert!(refs.get(RefType::Outlines).is_none());
    }

    #[test]
    fn bookmarks_to_missing_pages_are_left_out() {
        let mut outline = Outline::default();
        outline.add_bookmark(0, "Cover".into());
        outline.add_bookmark(7, "Nowhere".into());
        outline.add_bookmark(1, "Colours".into());
        let (refs, pdf) = render(&outline, 2);

        assert!(pdf.contains("/Count 2"));
        assert!(pdf.contains("(Cover)"));
        assert!(pdf.contains("(Colours)"));
        assert!(!pdf.contains("(Nowhere)"));
        // only two items exist, so prev/next can only link to written objects
        assert!(refs.get(RefType::OutlineEntry(1)).is_some());
        assert!(refs.get(RefType::OutlineEntry(2)).is_none());
    }

    #[test]
    fn no_resolvable_bookmark_means_no_outline() {
        let mut outline = Outline::default();
        outline.add_bookmark(3, "Nowhere".into());
        let (refs, _) = render(&outline, 1);
        assert!(refs.get(RefType::Outlines).is_none());
    }
}
