use chrono::{DateTime, Utc};

use super::{generated_line, placement_line, sections, Analytics, REPORT_TITLE};

pub fn render(analytics: &Analytics, generated_at: DateTime<Utc>) -> String {
    let mut out = vec![
        REPORT_TITLE.to_string(),
        "=".repeat(50),
        generated_line(generated_at),
        String::new(),
    ];

    for section in sections(analytics) {
        out.push(section.heading.to_ascii_uppercase());
        out.push("-".repeat(30));
        out.extend(section.lines);
        out.push(String::new());
    }
    // Placement closes the event block, before the trailing blank line
    out.insert(out.len() - 1, placement_line(analytics));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn text_report_layout() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let report = render(&crate::report::sample(), at);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "Admin Analytics Report");
        assert_eq!(lines[2], "Report Generated: 2024-03-01 09:30:00");
        assert_eq!(lines[4], "MAIN ANALYTICS");
        assert!(report.contains("Total TPOs: 3\n"));
        assert!(report.contains(&format!("JOB ANALYTICS\n{}\nActive Jobs: 4", "-".repeat(30))));
        assert!(report.ends_with("Total Event Registrations: 6\nOverall Placement Percentage: 37.5%\n"));
    }
}
