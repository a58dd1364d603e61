//! Plaintext document format of the store
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <root>
//!   <info service="name" username="username" password="password"/>
//!   ...
//! </root>
//! ```
//!
//! Field values live in attributes. Markup characters and every control
//! character are written as references so tabs and newlines come back
//! unchanged. NUL has no XML representation and is refused.

use std::borrow::Cow;
use std::fmt::Write as _;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use zeroize::Zeroizing;

use crate::credential::Entry;
use crate::error::{Result, VaultError};

pub const ROOT_ELEMENT: &str = "root";
pub const ENTRY_ELEMENT: &str = "info";
pub const SERVICE_ATTRIBUTE: &str = "service";
pub const USERNAME_ATTRIBUTE: &str = "username";
pub const PASSWORD_ATTRIBUTE: &str = "password";

/// Where the decoder is in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeRoot,
    InRoot,
    InEntry,
    AfterRoot,
}

/// Serialize entries, in order, to the plaintext document
pub fn encode(entries: &[Entry]) -> Result<Zeroizing<String>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(write_error)?;

    for entry in entries {
        let mut info = BytesStart::new(ENTRY_ELEMENT);
        for (name, value) in [
            (SERVICE_ATTRIBUTE, entry.service()),
            (USERNAME_ATTRIBUTE, entry.username()),
            (PASSWORD_ATTRIBUTE, entry.password()),
        ] {
            let escaped = Zeroizing::new(escape_attribute(name, value)?);
            // Pre-escaped: pushing an Attribute skips quick-xml's own escaping
            info.push_attribute(Attribute {
                key: QName(name.as_bytes()),
                value: Cow::Borrowed(escaped.as_bytes()),
            });
        }
        writer.write_event(Event::Empty(info)).map_err(write_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(write_error)?;

    let bytes = writer.into_inner();
    String::from_utf8(bytes)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::FormatError(e.to_string()))
}

/// Parse the plaintext document back into entries
///
/// Anything other than an optional declaration, comments, one `root`
/// element and `info` children carrying exactly the three attributes is a
/// [`VaultError::FormatError`]; nothing is returned on failure.
pub fn decode(text: &str) -> Result<Vec<Entry>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut position = Position::BeforeRoot;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| VaultError::FormatError(e.to_string()))?;

        match (position, event) {
            (_, Event::Eof) => break,
            (_, Event::Comment(_)) => {}
            (Position::BeforeRoot, Event::Decl(_)) => {}
            (Position::BeforeRoot, Event::Start(e)) if is_named(&e, ROOT_ELEMENT) => {
                position = Position::InRoot;
            }
            (Position::BeforeRoot, Event::Empty(e)) if is_named(&e, ROOT_ELEMENT) => {
                position = Position::AfterRoot;
            }
            (Position::InRoot, Event::Empty(e)) if is_named(&e, ENTRY_ELEMENT) => {
                entries.push(parse_entry(&e)?);
            }
            (Position::InRoot, Event::Start(e)) if is_named(&e, ENTRY_ELEMENT) => {
                entries.push(parse_entry(&e)?);
                position = Position::InEntry;
            }
            // End tag names are checked against their start tags by the reader
            (Position::InEntry, Event::End(_)) => position = Position::InRoot,
            (Position::InRoot, Event::End(_)) => position = Position::AfterRoot,
            (position, event) => {
                return Err(VaultError::FormatError(format!(
                    "unexpected {} {:?}",
                    describe(&event),
                    position
                )));
            }
        }
    }

    if position != Position::AfterRoot {
        return Err(VaultError::FormatError(
            "document has no complete root element".to_string(),
        ));
    }

    Ok(entries)
}

fn parse_entry(element: &BytesStart<'_>) -> Result<Entry> {
    let mut service = None;
    let mut username = None;
    let mut password = None;

    // Duplicate attributes are rejected by the attribute iterator itself
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| VaultError::FormatError(e.to_string()))?;
        let key = attribute.key.as_ref();

        let slot = if key == SERVICE_ATTRIBUTE.as_bytes() {
            &mut service
        } else if key == USERNAME_ATTRIBUTE.as_bytes() {
            &mut username
        } else if key == PASSWORD_ATTRIBUTE.as_bytes() {
            &mut password
        } else {
            return Err(VaultError::FormatError(format!(
                "unexpected attribute '{}'",
                String::from_utf8_lossy(key)
            )));
        };

        let value = attribute
            .unescape_value()
            .map_err(|e| VaultError::FormatError(e.to_string()))?;
        *slot = Some(value.into_owned());
    }

    Ok(Entry::new(
        service.ok_or_else(|| missing(SERVICE_ATTRIBUTE))?,
        username.ok_or_else(|| missing(USERNAME_ATTRIBUTE))?,
        password.ok_or_else(|| missing(PASSWORD_ATTRIBUTE))?,
    ))
}

fn escape_attribute(name: &str, value: &str) -> Result<String> {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\0' => {
                return Err(VaultError::FormatError(format!(
                    "{} contains a NUL character",
                    name
                )));
            }
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(escaped, "&#{};", u32::from(c));
            }
            c => escaped.push(c),
        }
    }
    Ok(escaped)
}

fn is_named(element: &BytesStart<'_>, name: &str) -> bool {
    element.name().as_ref() == name.as_bytes()
}

fn missing(attribute: &str) -> VaultError {
    VaultError::FormatError(format!("entry is missing the '{}' attribute", attribute))
}

fn describe(event: &Event<'_>) -> String {
    match event {
        Event::Start(e) | Event::Empty(e) => {
            format!("element <{}>", String::from_utf8_lossy(e.name().as_ref()))
        }
        Event::End(e) => format!("end tag </{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::Text(_) => "text".to_string(),
        Event::CData(_) => "CDATA section".to_string(),
        Event::Decl(_) => "XML declaration".to_string(),
        Event::PI(_) => "processing instruction".to_string(),
        Event::DocType(_) => "DOCTYPE".to_string(),
        Event::Comment(_) => "comment".to_string(),
        Event::Eof => "end of document".to_string(),
    }
}

fn write_error(e: impl std::fmt::Display) -> VaultError {
    VaultError::FormatError(format!("failed to write document: {}", e))
}
