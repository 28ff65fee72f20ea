//! ECP application list parsing.
//!
//! Both `query/apps` and `query/active-app` answer with a small XML document
//! whose root holds `<app>` elements:
//!
//! ```xml
//! <apps>
//!   <app id="12" type="appl" version="4.2.100079005">Netflix</app>
//! </apps>
//! ```
//!
//! Display names are kept exactly as they appear in the document, so
//! `Plex - Free Movies &amp; TV` stays escaped.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

/// One application installed on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRecord {
    /// Device-local identifier, opaque outside the device.
    pub id: String,
    /// Display name, verbatim from the document.
    pub name: String,
    /// Informational version string.
    pub version: String,
    /// The `type` attribute (`appl`, `tvin`, ...), if present.
    pub kind: Option<String>,
}

/// Errors from parsing an app list document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not well-formed XML.
    #[error("failed to extract apps from xml response: {0}")]
    Xml(String),
}

/// Convenient Result alias for catalog parsing.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Reads an attribute value, unescaping entities.
fn get_xml_attr(elem: &BytesStart, attr_name: &[u8]) -> CatalogResult<Option<String>> {
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| CatalogError::Xml(e.to_string()))?;
        if attr.key.as_ref() == attr_name {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(|e| CatalogError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn app_from_attrs(elem: &BytesStart, name: String) -> CatalogResult<AppRecord> {
    Ok(AppRecord {
        id: get_xml_attr(elem, b"id")?.unwrap_or_default(),
        version: get_xml_attr(elem, b"version")?.unwrap_or_default(),
        kind: get_xml_attr(elem, b"type")?,
        name,
    })
}

fn check_single_root(roots: usize) -> CatalogResult<()> {
    if roots > 1 {
        return Err(CatalogError::Xml("more than one root element".into()));
    }
    Ok(())
}

/// Parses an ECP app list document into records, in document order.
///
/// A document without any `<app>` element is a valid, empty catalog.
pub fn parse_apps(xml: &str) -> CatalogResult<Vec<AppRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut apps = Vec::new();
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    roots += 1;
                    check_single_root(roots)?;
                }
                if e.name().as_ref() == b"app" {
                    let end = e.to_end().into_owned();
                    let name = reader
                        .read_text(end.name())
                        .map_err(|err| CatalogError::Xml(err.to_string()))?;
                    apps.push(app_from_attrs(&e, name.into_owned())?);
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    roots += 1;
                    check_single_root(roots)?;
                }
                if e.name().as_ref() == b"app" {
                    apps.push(app_from_attrs(&e, String::new())?);
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CatalogError::Xml(e.to_string())),
            _ => {}
        }
    }

    if roots == 0 {
        return Err(CatalogError::Xml("no root element".into()));
    }
    if depth != 0 {
        return Err(CatalogError::Xml(format!("{} unclosed element(s)", depth)));
    }

    Ok(apps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecp::test_fixtures::{ACTIVE_APP_HOME_XML, ACTIVE_APP_XML, APPS_XML};

    #[test]
    fn parses_all_apps_in_document_order() {
        let apps = parse_apps(APPS_XML).unwrap();
        assert_eq!(apps.len(), 17);
        assert_eq!(
            apps[0],
            AppRecord {
                id: "2285".into(),
                name: "Hulu".into(),
                version: "6.81.0".into(),
                kind: Some("appl".into()),
            }
        );
        assert_eq!(apps[11].name, "Acorn TV");
        assert_eq!(apps[16].id, "683311");
    }

    #[test]
    fn names_are_not_unescaped() {
        let apps = parse_apps(APPS_XML).unwrap();
        assert_eq!(apps[2].name, "Plex - Free Movies &amp; TV");
    }

    #[test]
    fn parses_single_active_app() {
        let apps = parse_apps(ACTIVE_APP_XML).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "12");
        assert_eq!(apps[0].name, "Netflix");
    }

    #[test]
    fn app_without_attributes_has_empty_id() {
        let apps = parse_apps(ACTIVE_APP_HOME_XML).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "");
        assert_eq!(apps[0].name, "Roku");
        assert!(apps[0].kind.is_none());
    }

    #[test]
    fn empty_root_is_empty_catalog() {
        assert!(parse_apps("<apps></apps>").unwrap().is_empty());
        assert!(parse_apps("<apps/>").unwrap().is_empty());
    }

    #[test]
    fn self_closing_app_has_empty_name() {
        let apps = parse_apps(r#"<apps><app id="7" version="1"/></apps>"#).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "7");
        assert_eq!(apps[0].name, "");
    }

    #[test]
    fn second_root_element_is_error() {
        for xml in [
            r#"<apps><app id="1">Hulu</app></apps><apps><app id="2">PBS</app></apps>"#,
            r#"<apps/><apps/>"#,
            r#"<apps></apps><app id="2">PBS</app>"#,
        ] {
            assert!(parse_apps(xml).is_err(), "accepted {:?}", xml);
        }
    }

    #[test]
    fn malformed_markup_is_error() {
        for xml in [
            "<apps><app id=\"1\">Hulu</apps>",
            "<apps><app id=\"1\">Hulu</app>",
            "<apps></app></apps>",
            "",
            "not xml at all",
        ] {
            assert!(parse_apps(xml).is_err(), "accepted {:?}", xml);
        }
    }
}
