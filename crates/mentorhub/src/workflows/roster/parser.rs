use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One data row of a chapter roster export. Fields arrive trimmed by the
/// reader, with blank optionals collapsed to `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct RosterRow {
    #[serde(rename = "Member ID")]
    pub(crate) member_id: String,
    #[serde(rename = "Display Name")]
    pub(crate) display_name: String,
    #[serde(rename = "Chapter", default, deserialize_with = "empty_string_as_none")]
    pub(crate) chapter: Option<String>,
    #[serde(rename = "Role", default, deserialize_with = "empty_string_as_none")]
    pub(crate) role: Option<String>,
    #[serde(rename = "Tutor", default, deserialize_with = "empty_string_as_none")]
    pub(crate) tutor: Option<String>,
    #[serde(
        rename = "Active Limit",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) active_limit: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<RosterRow>() {
        rows.push(row?);
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
