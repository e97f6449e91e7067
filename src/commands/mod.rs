pub mod news_run;
pub mod news_show;
pub mod news_status;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::CommandReport;

    #[test]
    fn issue_flips_ok() {
        let mut report = CommandReport::new("run");
        report.detail("fine");
        assert!(report.ok);
        report.issue("broken");
        assert!(!report.ok);
        assert_eq!(report.issues, ["broken"]);
    }
}
