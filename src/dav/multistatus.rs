//! Parser for `207 Multi-Status` response bodies.
//!
//! Property values are represented as loose [`serde_json::Value`]s: text
//! nodes are coerced to integers/booleans where they parse as such, nested
//! elements become objects, and repeated child names collapse into arrays.

use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One parsed `<d:response>` entry: resource path plus its 2xx properties.
#[derive(Debug, Clone, PartialEq)]
pub struct DavResource {
    pub path: String,
    pub props: Map<String, Value>,
}

pub fn parse_multistatus(xml: &str) -> Result<Vec<DavResource>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut resources = Vec::new();
    loop {
        match reader.read_event()? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"response" => {
                resources.push(parse_response(&mut reader)?);
            }
            XmlEvent::Eof => break,
            _ => {}
        }
    }
    Ok(resources)
}

fn parse_response(reader: &mut Reader<&[u8]>) -> Result<DavResource> {
    let mut path = String::new();
    let mut props = Map::new();
    loop {
        match reader.read_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"href" => path = read_text(reader)?,
                b"propstat" => {
                    let (ok, propstat_props) = parse_propstat(reader)?;
                    if ok {
                        props.extend(propstat_props);
                    }
                }
                _ => {
                    parse_value(reader)?;
                }
            },
            XmlEvent::End(e) if e.local_name().as_ref() == b"response" => break,
            XmlEvent::Eof => return Err(truncated()),
            _ => {}
        }
    }
    Ok(DavResource { path, props })
}

fn parse_propstat(reader: &mut Reader<&[u8]>) -> Result<(bool, Map<String, Value>)> {
    let mut ok = false;
    let mut props = Map::new();
    loop {
        match reader.read_event()? {
            XmlEvent::Start(e) => match e.local_name().as_ref() {
                b"prop" => props = parse_prop(reader)?,
                b"status" => ok = status_is_success(&read_text(reader)?),
                _ => {
                    parse_value(reader)?;
                }
            },
            XmlEvent::End(e) if e.local_name().as_ref() == b"propstat" => break,
            XmlEvent::Eof => return Err(truncated()),
            _ => {}
        }
    }
    Ok((ok, props))
}

fn parse_prop(reader: &mut Reader<&[u8]>) -> Result<Map<String, Value>> {
    let mut props = Map::new();
    loop {
        match reader.read_event()? {
            XmlEvent::Start(e) => {
                let key = local_name(e.local_name().as_ref());
                let value = parse_value(reader)?;
                props.insert(key, value);
            }
            XmlEvent::Empty(e) => {
                let key = local_name(e.local_name().as_ref());
                props.insert(key, Value::String(String::new()));
            }
            XmlEvent::End(e) if e.local_name().as_ref() == b"prop" => break,
            XmlEvent::Eof => return Err(truncated()),
            _ => {}
        }
    }
    Ok(props)
}

/// Consume the current element and build its value: plain text coerces to a
/// scalar, child elements become an object keyed by local name.
fn parse_value(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut text = String::new();
    let mut children: Vec<(String, Value)> = Vec::new();
    loop {
        match reader.read_event()? {
            XmlEvent::Text(t) => text.push_str(&t.unescape()?),
            XmlEvent::Start(e) => {
                let key = local_name(e.local_name().as_ref());
                let value = parse_value(reader)?;
                children.push((key, value));
            }
            XmlEvent::Empty(e) => {
                let key = local_name(e.local_name().as_ref());
                children.push((key, Value::String(String::new())));
            }
            XmlEvent::End(_) => break,
            XmlEvent::Eof => return Err(truncated()),
            _ => {}
        }
    }
    if children.is_empty() {
        return Ok(coerce_text(&text));
    }
    let mut map = Map::new();
    for (key, value) in children {
        match map.get_mut(&key) {
            None => {
                map.insert(key, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    Ok(Value::Object(map))
}

fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            XmlEvent::Text(t) => text.push_str(&t.unescape()?),
            XmlEvent::Start(_) => depth += 1,
            XmlEvent::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            XmlEvent::Eof => return Err(truncated()),
            _ => {}
        }
    }
    Ok(text)
}

fn coerce_text(text: &str) -> Value {
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match text.parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(text.to_string()),
        },
    }
}

fn status_is_success(status: &str) -> bool {
    // status lines look like "HTTP/1.1 200 OK"
    status
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .map(|code| (200..300).contains(&code))
        .unwrap_or(false)
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn truncated() -> Error {
    Error::InvalidData("unexpected end of multistatus document".to_string())
}
