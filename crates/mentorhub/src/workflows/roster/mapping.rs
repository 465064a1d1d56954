use super::parser::RosterRow;
use super::RosterImportError;
use crate::workflows::tutoring::directory::{DirectoryRole, MemberRecord, TutorProfile};
use crate::workflows::tutoring::domain::{ChapterId, MemberId};

/// Convert a parsed roster row into a directory record. Identity fields are
/// mandatory; role, tutor flag, and limit fall back to defaults when the
/// export carries text we do not recognize.
pub(crate) fn member_from_row(
    row: RosterRow,
    line: usize,
) -> Result<MemberRecord, RosterImportError> {
    if row.member_id.trim().is_empty() {
        return Err(RosterImportError::InvalidRow {
            line,
            message: "missing member id".to_string(),
        });
    }
    if row.display_name.trim().is_empty() {
        return Err(RosterImportError::InvalidRow {
            line,
            message: "missing display name".to_string(),
        });
    }

    let tutor_profile = if parse_flag(row.tutor.as_deref()) {
        Some(TutorProfile {
            active_tutoring_limit: parse_limit(row.active_limit.as_deref()),
        })
    } else {
        None
    };

    Ok(MemberRecord {
        member_id: MemberId(row.member_id),
        display_name: row.display_name,
        chapter: row.chapter.map(ChapterId),
        role: parse_role(row.role.as_deref()),
        tutor_profile,
    })
}

pub(crate) fn parse_role(value: Option<&str>) -> DirectoryRole {
    match value.map(|role| role.trim().to_ascii_lowercase()) {
        Some(role) if matches!(role.as_str(), "program_admin" | "program admin" | "admin") => {
            DirectoryRole::ProgramAdmin
        }
        _ => DirectoryRole::Member,
    }
}

pub(crate) fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|flag| flag.trim().to_ascii_lowercase()).as_deref(),
        Some("yes" | "y" | "true" | "1")
    )
}

pub(crate) fn parse_limit(value: Option<&str>) -> Option<u32> {
    value.and_then(|raw| raw.trim().parse::<u32>().ok())
}
