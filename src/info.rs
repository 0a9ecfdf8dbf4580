use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// General document metadata such as title, author, etc
#[derive(Debug, Clone)]
pub struct Info {
    /// The title of the document.
    pub title: String,
    /// The author(s) of the document. No prescribed format.
    pub author: Option<String>,
    /// The subject of the document.
    pub subject: Option<String>,
    /// Keywords for the document, usually a comma separated list
    pub keywords: Option<String>,
    /// When the document content was created
    pub created: DateTime<Utc>,
}

impl Info {
    pub fn new<S: ToString>(title: S, created: DateTime<Utc>) -> Info {
        Info {
            title: title.to_string(),
            author: None,
            subject: None,
            keywords: None,
            created,
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        info.title(TextStr(self.title.as_str()));
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        let created = self.created;
        let date = PDate::new(created.year() as u16)
            .month(created.month() as u8)
            .day(created.day() as u8)
            .hour(created.hour() as u8)
            .minute(created.minute() as u8)
            .second(created.second() as u8)
            .utc_offset_hour(0)
            .utc_offset_minute(0);
        info.creation_date(date);
    }
}
