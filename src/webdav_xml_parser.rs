use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use std::str;

use crate::errors::{RepositoryError, Result};
use crate::models::ListingEntry;

#[derive(Debug, Default)]
struct PropFindResponse {
    href: Option<String>,
    is_collection: bool,
}

/// Parses a PROPFIND multistatus body into listing entries, in document order.
///
/// Elements are matched on their local name, so `<d:response>` with
/// `xmlns:d="DAV:"` and `<response>` under a default `xmlns="DAV:"` parse
/// identically. A `response` without an `href` is skipped. A body that is
/// not a multistatus document at all is a parse error.
pub fn parse_multistatus(xml_text: &str) -> Result<Vec<ListingEntry>> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current_response: Option<PropFindResponse> = None;
    let mut seen_multistatus = false;
    let mut in_href = false;
    let mut href_text = String::new();

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = get_local_name(&e)?;

                match name.as_str() {
                    "multistatus" => seen_multistatus = true,
                    "response" => current_response = Some(PropFindResponse::default()),
                    "href" if current_response.is_some() => {
                        in_href = true;
                        href_text.clear();
                    }
                    "collection" => mark_collection(&mut current_response),
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let name = get_local_name(&e)?;

                match name.as_str() {
                    "multistatus" => seen_multistatus = true,
                    "collection" => mark_collection(&mut current_response),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_href {
                    let text = e
                        .unescape()
                        .map_err(|e| RepositoryError::parse(format!("invalid href text: {}", e)))?;
                    href_text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_href {
                    let raw = e.into_inner();
                    let text = str::from_utf8(&raw)
                        .map_err(|e| RepositoryError::parse(format!("invalid UTF-8 in href: {}", e)))?;
                    href_text.push_str(text);
                }
            }
            Ok(Event::End(e)) => {
                let name = get_local_name_from_end(&e)?;

                match name.as_str() {
                    "href" if in_href => {
                        in_href = false;
                        // First href wins; later ones belong to nested elements.
                        if let Some(ref mut resp) = current_response {
                            let href = href_text.trim();
                            if resp.href.is_none() && !href.is_empty() {
                                resp.href = Some(href.to_string());
                            }
                        }
                    }
                    "response" => {
                        if let Some(resp) = current_response.take() {
                            match resp.href {
                                Some(path) => entries.push(ListingEntry {
                                    path,
                                    is_collection: resp.is_collection,
                                }),
                                None => {
                                    tracing::debug!("Skipping multistatus response without href");
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RepositoryError::parse(format!(
                    "XML parsing error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }

        buf.clear();
    }

    if !seen_multistatus {
        return Err(RepositoryError::parse("document has no multistatus element"));
    }
    if current_response.is_some() {
        return Err(RepositoryError::parse("document ended inside a response element"));
    }

    Ok(entries)
}

fn mark_collection(current_response: &mut Option<PropFindResponse>) {
    if let Some(ref mut resp) = current_response {
        resp.is_collection = true;
    }
}

fn get_local_name(e: &BytesStart) -> Result<String> {
    let qname = e.name();
    let local = qname.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| RepositoryError::parse(format!("Invalid UTF-8 in element name: {}", e)))?;
    Ok(name.to_string())
}

fn get_local_name_from_end(e: &BytesEnd) -> Result<String> {
    let qname = e.name();
    let local = qname.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| RepositoryError::parse(format!("Invalid UTF-8 in element name: {}", e)))?;
    Ok(name.to_string())
}
