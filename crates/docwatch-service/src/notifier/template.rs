//! Subject and HTML body rendering for expiry notices.

use std::fmt::Write;

use super::service::ExpiryNotice;

const EXPIRED_COLOR: &str = "#dc3545";
const EXPIRING_COLOR: &str = "#ffc107";

/// Subject line. Tagged with the category; wording depends on urgency.
pub fn subject(notice: &ExpiryNotice) -> String {
    if notice.is_expired {
        format!(
            "[{}] URGENT: {} Has Expired",
            notice.category.label(),
            notice.document_name
        )
    } else {
        format!(
            "[{}] Reminder: {} Expiring Soon",
            notice.category.label(),
            notice.document_name
        )
    }
}

/// Status phrase shown in the body.
pub fn status_phrase(is_expired: bool) -> &'static str {
    if is_expired {
        "has expired"
    } else {
        "will expire soon"
    }
}

/// HTML body addressed to the operator mailbox.
///
/// Every value taken from a record is escaped before interpolation.
pub fn html_body(notice: &ExpiryNotice, recipient: &str, signature: &str) -> String {
    let color = if notice.is_expired {
        EXPIRED_COLOR
    } else {
        EXPIRING_COLOR
    };
    let action = if notice.is_expired {
        "This document has expired. Please renew or update it immediately."
    } else {
        "This document is approaching its expiry date. Please start the renewal process."
    };

    let category = notice.category.label();
    let parent = escape_html(&notice.parent_name);
    let document = escape_html(&notice.document_name);
    let phone = escape_html(&notice.phone);
    let email = escape_html(&notice.parent_email);
    let expiry = notice.expiry_date.format("%d-%b-%Y");

    let mut html = String::with_capacity(2048);
    // Writing to a String cannot fail.
    let _ = write!(
        html,
        r#"<html>
<head>
<style>
  body {{ font-family: 'Segoe UI', Arial, sans-serif; background: #f4f6f8; color: #333; margin: 0; }}
  .card {{ max-width: 640px; margin: 32px auto; background: #fff; border: 1px solid #e5e5e5; border-radius: 8px; overflow: hidden; }}
  .header {{ background: {color}; color: #fff; text-align: center; padding: 20px; }}
  .content {{ padding: 24px 28px; font-size: 15px; line-height: 1.6; }}
  .details {{ border-left: 4px solid {color}; background: #f0f7ff; padding: 12px 16px; border-radius: 6px; }}
  .status {{ color: {color}; font-weight: bold; }}
  .footer {{ background: #fafafa; text-align: center; font-size: 12px; color: #777; padding: 12px; border-top: 1px solid #eee; }}
</style>
</head>
<body>
<div class="card">
  <div class="header"><h2>{category} Document Expiry Notification</h2></div>
  <div class="content">
    <p>Dear <strong>{recipient}</strong>,</p>
    <p>A document belonging to <strong>{parent}</strong> ({category}) needs attention.</p>
    <div class="details">
      <p><b>Status:</b> {status}</p>
      <p><b>Document Name:</b> {document}</p>
      <p><b>Expiry Date:</b> {expiry}</p>
    </div>
    <p><b>{parent} contact details:</b><br/>Phone: {phone}<br/>Email: {email}</p>
    <p class="status">{action}</p>
    <p>Regards,<br/><b>{signature}</b></p>
  </div>
  <div class="footer">This is an automated notification. Please do not reply to this email.</div>
</div>
</body>
</html>
"#,
        recipient = escape_html(recipient),
        status = status_phrase(notice.is_expired),
        signature = escape_html(signature),
    );
    html
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
