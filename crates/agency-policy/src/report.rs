//! Policy report export

use chrono::NaiveDate;

use crate::policy::Policy;

pub const REPORT_HEADER: &str = "Policy Number,Company,Insured Name,Expiry Date,Premium,Status";

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render policies as CSV, one row per policy in the given order.
///
/// The insured name is always quoted; other fields only when needed.
pub fn render_csv(policies: &[Policy]) -> String {
    let mut out = String::from(REPORT_HEADER);

    for policy in policies {
        out.push('\n');
        let row = [
            escape_field(&policy.policy_number),
            escape_field(policy.company.as_str()),
            quote(&policy.insured_name),
            escape_field(&policy.expiry_date),
            policy.premium_amount.to_string(),
            escape_field(policy.status.as_str()),
        ];
        out.push_str(&row.join(","));
    }

    out
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("Full_Policy_Report_{}.csv", date.format("%Y-%m-%d"))
}
