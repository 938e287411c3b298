//! Address-book export: an XML phonebook of every contact, served only when
//! the feature flag is on and the requested filename is on the allow-list.

use rusqlite::Connection;

use crate::db::profile_repo;
use crate::error::{CrmError, CrmResult};

/// Filenames the endpoint will answer to. Exactly one is accepted.
pub const ACCEPTED_FILE_NAMES: &[&str] = &["gs_phonebook.xml"];

#[derive(Debug, Clone, Copy, Default)]
pub struct AddressBookConfig {
    pub enabled: bool,
}

/// Render the phonebook XML, or a not-found error when the feature is off
/// or the filename isn't on the allow-list.
pub fn address_book_xml(
    conn: &Connection,
    config: AddressBookConfig,
    file_name: &str,
) -> CrmResult<String> {
    if !config.enabled || !ACCEPTED_FILE_NAMES.contains(&file_name) {
        return Err(CrmError::NotFound {
            entity_type: "AddressBook".into(),
            id: file_name.into(),
        });
    }

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<AddressBook>\n");
    for (profile, user) in profile_repo::find_all_with_users(conn)? {
        xml.push_str("  <Contact>\n");
        xml.push_str(&format!(
            "    <FirstName>{}</FirstName>\n",
            xml_escape(&user.first_name)
        ));
        xml.push_str(&format!(
            "    <LastName>{}</LastName>\n",
            xml_escape(&user.last_name)
        ));
        xml.push_str(&format!("    <Email>{}</Email>\n", xml_escape(&user.email)));
        for phone in profile_repo::find_phones(conn, profile.id)? {
            xml.push_str(&format!(
                "    <Phone type=\"{}\">{}</Phone>\n",
                phone.phone_type.to_db_str(),
                xml_escape(&phone.number)
            ));
        }
        xml.push_str("  </Contact>\n");
    }
    xml.push_str("</AddressBook>\n");

    Ok(xml)
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
