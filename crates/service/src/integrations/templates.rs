//! Bodies of the emails the back office sends.

use models::{contact_message, meeting};

use super::mail::Email;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|p| format!("<p>{}</p>", escape(p.trim()).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn when(m: &meeting::Model) -> String {
    format!("{} ({} minutes, {})", m.start_time.format("%A %e %B %Y, %H:%M UTC"), m.duration_minutes, m.timezone)
}

pub fn meeting_invitation(site: &str, m: &meeting::Model) -> Email {
    let link_text = m.meeting_link.as_deref().map(|l| format!("\nJoin: {l}")).unwrap_or_default();
    let link_html = m
        .meeting_link
        .as_deref()
        .map(|l| format!("<p><a href=\"{0}\">Join the video call</a></p>", escape(l)))
        .unwrap_or_default();
    Email {
        to: m.attendee_email.clone(),
        subject: format!("{site}: {}", m.title),
        text: format!(
            "Hello {},\n\nYou are invited to \"{}\" on {}.{}\n\n{}\n\n{site}",
            m.attendee_name,
            m.title,
            when(m),
            link_text,
            m.description
        ),
        html: format!(
            "<p>Hello {},</p><p>You are invited to <strong>{}</strong> on {}.</p>{}{}<p>{}</p>",
            escape(&m.attendee_name),
            escape(&m.title),
            escape(&when(m)),
            link_html,
            paragraphs(&m.description),
            escape(site)
        ),
        reply_to: None,
    }
}

pub fn meeting_cancellation(site: &str, m: &meeting::Model, reason: Option<&str>) -> Email {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    Email {
        to: m.attendee_email.clone(),
        subject: format!("{site}: cancelled: {}", m.title),
        text: format!(
            "Hello {},\n\n\"{}\" on {} has been cancelled.{}\n\n{site}",
            m.attendee_name,
            m.title,
            when(m),
            reason.map(|r| format!("\n\nReason: {r}")).unwrap_or_default()
        ),
        html: format!(
            "<p>Hello {},</p><p><strong>{}</strong> on {} has been cancelled.</p>{}<p>{}</p>",
            escape(&m.attendee_name),
            escape(&m.title),
            escape(&when(m)),
            reason.map(|r| format!("<p>Reason: {}</p>", escape(r))).unwrap_or_default(),
            escape(site)
        ),
        reply_to: None,
    }
}

/// Sent to the agency inbox; replying goes straight to the visitor.
pub fn contact_notification(site: &str, inbox: &str, c: &contact_message::Model) -> Email {
    let subject = c.subject.as_deref().unwrap_or("New contact message");
    let phone = c.phone.as_deref().unwrap_or("-");
    Email {
        to: inbox.to_string(),
        subject: format!("[{site}] {subject}"),
        text: format!("From: {} <{}>\nPhone: {phone}\n\n{}", c.name, c.email, c.message),
        html: format!(
            "<p>From: {} &lt;{}&gt;<br>Phone: {}</p>{}",
            escape(&c.name),
            escape(&c.email),
            escape(phone),
            paragraphs(&c.message)
        ),
        reply_to: Some(c.email.clone()),
    }
}

pub fn contact_reply(site: &str, reply_to: Option<&str>, c: &contact_message::Model, body: &str) -> Email {
    let subject = c.subject.as_deref().map(|s| format!("Re: {s}")).unwrap_or_else(|| format!("Re: your message to {site}"));
    Email {
        to: c.email.clone(),
        subject,
        text: format!("Hello {},\n\n{body}\n\n{site}\n\n> {}", c.name, c.message.replace('\n', "\n> ")),
        html: format!(
            "<p>Hello {},</p>{}<p>{}</p><blockquote>{}</blockquote>",
            escape(&c.name),
            paragraphs(body),
            escape(site),
            paragraphs(&c.message)
        ),
        reply_to: reply_to.filter(|r| !r.is_empty()).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn meeting() -> meeting::Model {
        let start = Utc.with_ymd_and_hms(2030, 1, 2, 9, 30, 0).unwrap().fixed_offset();
        meeting::Model {
            id: Uuid::new_v4(),
            title: "Studio <visit>".into(),
            description: "Bring sketches".into(),
            attendee_name: "Ada".into(),
            attendee_email: "ada@example.com".into(),
            artist_id: None,
            start_time: start,
            duration_minutes: 30,
            timezone: "UTC".into(),
            meeting_link: Some("https://meet.example.com/abc".into()),
            calendar_event_id: None,
            status: meeting::MeetingStatus::Scheduled,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn invitation_escapes_html_and_links_the_call() {
        let email = meeting_invitation("Studio", &meeting());
        assert_eq!(email.to, "ada@example.com");
        assert!(email.html.contains("Studio &lt;visit&gt;"));
        assert!(email.html.contains("https://meet.example.com/abc"));
        assert!(email.text.contains("30 minutes"));
    }

    #[test]
    fn cancellation_mentions_reason_only_when_given() {
        let m = meeting();
        assert!(meeting_cancellation("Studio", &m, Some("Sick")).text.contains("Reason: Sick"));
        assert!(!meeting_cancellation("Studio", &m, Some("  ")).text.contains("Reason"));
    }
}
