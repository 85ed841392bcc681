//! Email content: the assignment notice sent for each action item and the
//! follow-up draft returned by `/generate_email`.

use crate::error::{validation_error, Error};
use crate::summary::ActionItem;
use email_address::EmailAddress;
use log::*;
use meeting_ai::types::notification::{Message, Recipient};
use serde::Serialize;
use utoipa::ToSchema;

/// Subject and plain-text body of a drafted email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FollowUpEmail {
    pub subject: String,
    pub body: String,
}

/// Mailbox of an assignee at `domain`.
///
/// The name is lowercased, runs of whitespace become single dots and every
/// character outside `[a-z0-9._-]` is dropped. "Carol Ann" at example.com is
/// `carol.ann@example.com`.
pub fn recipient_email(assignee: &str, domain: &str) -> Result<String, Error> {
    let local_part: String = assignee
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(*c, '.' | '_' | '-'))
        .collect();
    let address = format!("{}@{}", local_part.trim_matches('.'), domain);

    if EmailAddress::is_valid(&address) {
        Ok(address)
    } else {
        warn!("No valid email address for assignee \"{}\"", assignee);
        Err(validation_error(&format!(
            "Cannot derive an email address for assignee \"{assignee}\""
        )))
    }
}

/// Notice telling the assignee about a task from the meeting.
pub fn assignment_notification(item: &ActionItem, recipient_domain: &str) -> Result<Message, Error> {
    let email = recipient_email(&item.assignee, recipient_domain)?;

    Ok(Message {
        recipient: Recipient {
            email,
            name: Some(item.assignee.clone()),
        },
        subject: format!("New Task Assignment: {}", item.task),
        body: format!(
            "Dear {assignee},\n\n\
             You have been assigned a new task:\n\n\
             Task: {task}\n\
             Due Date: {due_date}\n\n\
             Please complete this task by the due date.\n\n\
             Best regards,\n\
             Meeting Summarizer Bot\n",
            assignee = item.assignee,
            task = item.task,
            due_date = item.due_date.format("%Y-%m-%d"),
        ),
    })
}

/// Draft a follow-up email for an action item. Every field must be present and
/// non-blank.
pub fn follow_up_email(
    task: Option<&str>,
    assignee: Option<&str>,
    due_date: Option<&str>,
) -> Result<FollowUpEmail, Error> {
    fn present(field: Option<&str>) -> Option<&str> {
        field.filter(|value| !value.trim().is_empty())
    }

    let (Some(task), Some(assignee), Some(due_date)) =
        (present(task), present(assignee), present(due_date))
    else {
        return Err(validation_error("Missing required data"));
    };

    Ok(FollowUpEmail {
        subject: task.to_string(),
        body: format!(
            "Dear {assignee},\n\n\
             I hope this email finds you well. I wanted to follow up on an action item from our recent meeting:\n\n\
             {task}\n\n\
             Due Date: {due_date}\n\n\
             Please let me know if you need any additional information or resources to complete this task. \
             I'm here to help if you have any questions.\n\n\
             Best regards,\n\
             Meeting Summarizer\n"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_recipient_email_from_assignee_name() {
        assert_eq!(
            recipient_email("Alice", "example.com").unwrap(),
            "alice@example.com"
        );
        assert_eq!(
            recipient_email("  Carol   Ann ", "example.com").unwrap(),
            "carol.ann@example.com"
        );
        assert_eq!(
            recipient_email("O'Brien, Dana", "example.com").unwrap(),
            "obrien.dana@example.com"
        );
    }

    #[test]
    fn test_recipient_email_rejects_names_without_usable_characters() {
        assert!(recipient_email("李雷", "example.com").is_err());
        assert!(recipient_email("Alice", "not a domain").is_err());
    }

    #[test]
    fn test_assignment_notification_content() {
        let item = ActionItem {
            task: "Send report".to_string(),
            assignee: "Alice".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };

        let message = assignment_notification(&item, "example.com").unwrap();

        assert_eq!(message.recipient.email, "alice@example.com");
        assert_eq!(message.recipient.name.as_deref(), Some("Alice"));
        assert_eq!(message.subject, "New Task Assignment: Send report");
        assert!(message.body.starts_with("Dear Alice,"));
        assert!(message.body.contains("Task: Send report\nDue Date: 2024-05-01"));
        assert!(message.body.ends_with("Meeting Summarizer Bot\n"));
    }

    #[test]
    fn test_follow_up_email() {
        let email = follow_up_email(Some("Book room"), Some("Bob"), Some("2024-06-04")).unwrap();

        assert_eq!(email.subject, "Book room");
        assert!(email.body.starts_with("Dear Bob,\n\n"));
        assert!(email.body.contains("\n\nBook room\n\nDue Date: 2024-06-04\n\n"));
    }

    #[test]
    fn test_follow_up_email_requires_every_field() {
        let cases = [
            (None, Some("Bob"), Some("2024-06-04")),
            (Some("Book room"), Some(" "), Some("2024-06-04")),
            (Some("Book room"), Some("Bob"), None),
        ];
        for (task, assignee, due_date) in cases {
            let err = follow_up_email(task, assignee, due_date).unwrap_err();
            assert_eq!(err.to_string(), "Missing required data");
        }
    }
}
