use serde::Serialize;

use crate::core::feed::CandidateEntry;

/// Body of a Slack incoming-webhook message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NotificationPayload {
    pub text: String,
}

impl NotificationPayload {
    pub fn for_entry(entry: &CandidateEntry) -> Self {
        Self {
            text: format_entry(entry),
        }
    }
}

pub fn format_entry(entry: &CandidateEntry) -> String {
    format!("*{}*\n{}\n <{}>", entry.title, entry.author, entry.link)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> CandidateEntry {
        CandidateEntry {
            title: "Bug #1042 (New): Login page returns 500".to_string(),
            author: "Alice Tanaka".to_string(),
            link: "https://redmine.example.com/issues/1042".to_string(),
        }
    }

    #[test]
    fn formats_bold_title_author_and_link() {
        assert_eq!(
            format_entry(&sample_entry()),
            "*Bug #1042 (New): Login page returns 500*\nAlice Tanaka\n <https://redmine.example.com/issues/1042>"
        );
    }

    #[test]
    fn payload_serializes_to_single_text_field() {
        let payload = NotificationPayload::for_entry(&sample_entry());
        let value = serde_json::to_value(&payload).expect("payload must serialize");

        let object = value.as_object().expect("payload must be an object");
        assert_eq!(object.len(), 1);
        assert_eq!(object["text"], format_entry(&sample_entry()));
    }
}
