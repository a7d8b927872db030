use crate::domain::report::ReportStatus;

/// Darija wording of a report status, as spoken in the narration
pub fn severity_term(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Normal => "كلشي مزيان",
        ReportStatus::Vigilance => "خاصك تحضي",
        ReportStatus::Alerte => "كاين الخطر",
    }
}
