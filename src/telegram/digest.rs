// src/telegram/digest.rs
use super::{MessageSender, TextFormat};
use crate::cover_letter::CoverLetterGenerator;
use crate::job_scraping::Posting;
use crate::utils::{escape_html, truncate_chars};
use tracing::{info, warn};

const MAX_LETTER_INPUT_CHARS: usize = 2000;
// Keeps the whole message under Telegram's 4096 character limit.
const MAX_LETTER_CHARS: usize = 3500;
const LETTER_FAILED: &str = "(Could not generate a cover letter. Check YANDEX_API_KEY.)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliverySummary {
    pub sent: usize,
    pub total: usize,
}

impl DeliverySummary {
    pub fn all_sent(&self) -> bool {
        self.sent == self.total
    }
}

pub fn format_posting_message(posting: &Posting, letter: &str, resume_pdf_url: &str) -> String {
    format!(
        "<b>{}</b>\nCompany: {}\n\nLink: {}\n\n<b>Cover letter:</b>\n{}\n\nResume PDF: {}",
        escape_html(&posting.title),
        escape_html(&posting.company),
        escape_html(&posting.url),
        escape_html(&truncate_chars(letter, MAX_LETTER_CHARS)),
        escape_html(resume_pdf_url),
    )
}

/// Generate a letter and send one message per posting, in order.
///
/// Letter failures fall back to a placeholder; send failures are logged and
/// skipped so the remaining postings still go out.
pub async fn deliver_digest(
    sender: &dyn MessageSender,
    chat_id: i64,
    generator: &dyn CoverLetterGenerator,
    postings: &[Posting],
    resume_pdf_url: &str,
) -> DeliverySummary {
    let mut summary = DeliverySummary {
        sent: 0,
        total: postings.len(),
    };

    for posting in postings {
        let description = if posting.description.is_empty() {
            &posting.title
        } else {
            &posting.description
        };
        let description = truncate_chars(description, MAX_LETTER_INPUT_CHARS);

        let letter = match generator
            .generate(&posting.title, &description, &posting.company)
            .await
        {
            Ok(letter) => letter,
            Err(e) => {
                warn!("Cover letter failed for {}: {:#}", posting.url, e);
                LETTER_FAILED.to_string()
            }
        };

        let message = format_posting_message(posting, &letter, resume_pdf_url);
        match sender.send_message(chat_id, &message, TextFormat::Html).await {
            Ok(()) => summary.sent += 1,
            Err(e) => warn!("Send error for {}: {:#}", posting.url, e),
        }
    }

    info!("Digest delivered: {} of {} postings", summary.sent, summary.total);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedGenerator, RecordingSender};

    fn posting(n: u32, title: &str) -> Posting {
        Posting {
            url: format!("https://wise.jobs/job/designer-jid-{}", n),
            title: title.to_string(),
            team: String::new(),
            company: "Wise".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_message_layout_escapes_html() {
        let message = format_posting_message(
            &posting(1, "UI & Brand <Lead>"),
            "Dear team",
            "https://cv.example/cv.pdf",
        );

        assert_eq!(
            message,
            "<b>UI &amp; Brand &lt;Lead&gt;</b>\nCompany: Wise\n\n\
             Link: https://wise.jobs/job/designer-jid-1\n\n\
             <b>Cover letter:</b>\nDear team\n\n\
             Resume PDF: https://cv.example/cv.pdf"
        );
    }

    #[tokio::test]
    async fn test_send_failure_does_not_block_later_postings() {
        let sender = RecordingSender::failing_on(&["Second"]);
        let generator = FixedGenerator::ok("Letter");
        let postings = vec![
            posting(1, "First Designer"),
            posting(2, "Second Designer"),
            posting(3, "Third Designer"),
        ];

        let summary = deliver_digest(&sender, 42, &generator, &postings, "cv.pdf").await;

        assert_eq!(summary, DeliverySummary { sent: 2, total: 3 });
        assert!(!summary.all_sent());
        let sent = sender.messages();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].1.contains("First Designer"));
        assert!(sent[1].1.contains("Third Designer"));
    }

    #[tokio::test]
    async fn test_letter_failure_uses_placeholder() {
        let sender = RecordingSender::new();
        let generator = FixedGenerator::failing();

        let summary =
            deliver_digest(&sender, 42, &generator, &[posting(1, "Designer")], "cv.pdf").await;

        assert!(summary.all_sent());
        assert!(sender.messages()[0].1.contains(LETTER_FAILED));
    }

    #[tokio::test]
    async fn test_generator_gets_title_when_description_missing() {
        let sender = RecordingSender::new();
        let generator = FixedGenerator::ok("Letter");

        deliver_digest(&sender, 42, &generator, &[posting(1, "Designer")], "cv.pdf").await;

        assert_eq!(
            generator.calls(),
            vec![("Designer".to_string(), "Designer".to_string(), "Wise".to_string())]
        );
    }
}
