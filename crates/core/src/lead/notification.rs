//! Sales team email content.

use zeno_shared::{EmailAttachment, OutgoingEmail};

use super::submission::LeadSubmission;
use crate::estimate::{RenderedEstimate, escape_html};

const CELL_STYLE: &str = "padding:6px 8px;border:1px solid #eee;";
const WRAPPER_OPEN: &str = "<div style='font-family:Arial,sans-serif;line-height:1.45;color:#222'>";

/// "Lead Details" table listing every collected field. Missing values are
/// left empty and all values are HTML-escaped.
#[must_use]
pub fn lead_overview_html(lead: &LeadSubmission) -> String {
    let custom_amount = lead.budget_amount.map(|amount| amount.to_string());
    let fields: [(&str, Option<&str>); 12] = [
        ("Name", lead.name.as_deref()),
        ("Company", lead.company_name.as_deref()),
        ("Email", lead.email.as_deref()),
        ("Phone", lead.phone.as_deref()),
        ("Path", lead.path.as_deref()),
        ("Category", lead.category.as_deref()),
        ("Employee Size", lead.employee_size.as_deref()),
        ("Budget", lead.budget.as_deref()),
        ("Custom Amount", custom_amount.as_deref()),
        ("Start Time", lead.start_time.as_deref()),
        ("Requirements", lead.requirement_text.as_deref()),
        ("CV Filename", lead.cv_filename.as_deref()),
    ];

    let rows: String = fields
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td style='{CELL_STYLE}'>{label}</td><td style='{CELL_STYLE}'>{}</td></tr>",
                escape_html(value.unwrap_or_default())
            )
        })
        .collect();

    format!(
        "<h3 style='margin:10px 0 6px;'>Lead Details</h3>\
         <table style='border-collapse:collapse;font-size:14px;'><tbody>{rows}</tbody></table>"
    )
}

/// Email sent to sales for a new lead: overview plus the estimate.
#[must_use]
pub fn lead_email(lead: &LeadSubmission, estimate: &RenderedEstimate) -> OutgoingEmail {
    let company = lead.company_name.as_deref().unwrap_or_default();
    let category = lead
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("Service");

    OutgoingEmail {
        subject: format!("New Lead: {company} - {category}"),
        html: format!(
            "{WRAPPER_OPEN}<h2 style='margin:0 0 10px'>New Lead Received</h2>\
             {}<div style='margin:12px 0'>{}</div></div>",
            lead_overview_html(lead),
            estimate.html
        ),
        reply_to: lead.reply_to().map(ToString::to_string),
        attachments: Vec::new(),
    }
}

/// Email sent to sales for a CV upload, with the PDF attached.
#[must_use]
pub fn cv_upload_email(applicant: &LeadSubmission, filename: &str, content: Vec<u8>) -> OutgoingEmail {
    let name = applicant
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Candidate");

    OutgoingEmail {
        subject: format!("New CV Upload: {name}"),
        html: format!(
            "{WRAPPER_OPEN}<h2 style='margin:0 0 10px'>New CV Upload</h2>\
             {}<p style='margin:8px 0 0;'>CV attached.</p></div>",
            lead_overview_html(applicant)
        ),
        reply_to: applicant.reply_to().map(ToString::to_string),
        attachments: vec![EmailAttachment {
            filename: filename.to_string(),
            content_type: "application/pdf".to_string(),
            content,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::EstimateEngine;

    fn lead() -> LeadSubmission {
        LeadSubmission {
            name: Some("Asha <admin>".to_string()),
            company_name: Some("Acme & Co".to_string()),
            email: Some("asha@acme.test".to_string()),
            category: Some("Web Development".to_string()),
            budget_amount: Some(100_000),
            ..LeadSubmission::default()
        }
    }

    #[test]
    fn test_overview_lists_all_fields_escaped() {
        let html = lead_overview_html(&lead());

        assert!(html.starts_with("<h3 style='margin:10px 0 6px;'>Lead Details</h3>"));
        assert_eq!(html.matches("<tr>").count(), 12);
        assert!(html.contains(">Asha &lt;admin&gt;</td>"));
        assert!(html.contains(">Acme &amp; Co</td>"));
        assert!(html.contains(">Custom Amount</td><td style='padding:6px 8px;border:1px solid #eee;'>100000</td>"));
        assert!(html.contains(">CV Filename</td><td style='padding:6px 8px;border:1px solid #eee;'></td>"));
        assert!(!html.contains("<admin>"));
    }

    #[test]
    fn test_lead_email() {
        let lead = lead();
        let estimate = EstimateEngine::default().estimate(&lead.budget_input());
        let email = lead_email(&lead, &estimate);

        assert_eq!(email.subject, "New Lead: Acme & Co - Web Development");
        assert_eq!(email.reply_to.as_deref(), Some("asha@acme.test"));
        assert!(email.html.contains("New Lead Received"));
        assert!(email.html.contains("Lead Details"));
        assert!(email.html.contains(&estimate.html));
        assert!(email.attachments.is_empty());
    }

    #[test]
    fn test_lead_email_defaults() {
        let estimate = EstimateEngine::default().estimate(&LeadSubmission::default().budget_input());
        let email = lead_email(&LeadSubmission::default(), &estimate);
        assert_eq!(email.subject, "New Lead:  - Service");
        assert_eq!(email.reply_to, None);
    }

    #[test]
    fn test_cv_upload_email() {
        let applicant = LeadSubmission {
            cv_filename: Some("20260108093005_cv.pdf".to_string()),
            path: Some("job".to_string()),
            ..LeadSubmission::default()
        };
        let email = cv_upload_email(&applicant, "20260108093005_cv.pdf", b"%PDF".to_vec());

        assert_eq!(email.subject, "New CV Upload: Candidate");
        assert!(email.html.contains("CV attached."));
        assert!(email.html.contains("20260108093005_cv.pdf"));
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(email.attachments[0].content_type, "application/pdf");
        assert_eq!(email.attachments[0].content, b"%PDF");
    }
}
