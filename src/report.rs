use std::fs;
use std::path::Path;

use anyhow::Context;
use encoding_rs::{Encoding, UTF_8};
use roxmltree::{Document, Node};

use crate::error::{CheckError, Result};
use crate::types::MetricCounts;

const PROJECT_TAG: &str = "project";
const FILE_TAG: &str = "file";
const METRICS_TAG: &str = "metrics";

/// Reads the whole report into memory and decodes it; the file handle is
/// closed on return.
///
/// # Errors
/// Returns [`CheckError::ReadReport`] if the file cannot be read and
/// [`CheckError::Undecodable`] if its bytes do not match its encoding.
pub fn read_report(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("read file: {}", path.display()))
        .map_err(CheckError::ReadReport)?;
    decode_report(&bytes)
}

/// Decodes raw report bytes.
///
/// A byte order mark wins, then the `encoding` of the XML declaration, then
/// UTF-8.
///
/// # Errors
/// Returns [`CheckError::Undecodable`] on malformed byte sequences.
pub fn decode_report(bytes: &[u8]) -> Result<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((enc, bom_len)) => (enc, &bytes[bom_len..]),
        None => (
            declared_encoding(bytes)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
                .unwrap_or(UTF_8),
            bytes,
        ),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| CheckError::Undecodable {
            encoding: encoding.name().to_string(),
        })
}

fn declared_encoding(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = bytes.windows(2).position(|w| w == b"?>")?;
    let decl = String::from_utf8_lossy(&bytes[..end]);
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_string())
}

/// Parses a Clover report and selects the metrics records to aggregate.
///
/// With an empty `filter` this yields every `<metrics>` element directly under
/// a `<project>` element, in document order. Otherwise it yields one record
/// per requested file name, in filter order.
///
/// # Errors
/// Returns [`CheckError::MalformedReport`] for invalid XML and
/// [`CheckError::FileFilterNotFound`] when any requested name does not map
/// to exactly one file metrics node.
pub fn load_metrics(xml: &str, filter: &[String]) -> Result<Vec<MetricCounts>> {
    let doc = Document::parse(xml)?;

    if filter.is_empty() {
        return Ok(project_metrics(&doc).map(read_counts).collect());
    }

    let mut records = Vec::with_capacity(filter.len());
    let mut missing = Vec::new();
    for name in filter {
        let mut matches = file_metrics(&doc, name);
        match (matches.next(), matches.next()) {
            (Some(node), None) => records.push(read_counts(node)),
            _ => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(CheckError::FileFilterNotFound(missing));
    }
    Ok(records)
}

fn project_metrics<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants()
        .filter(|n| n.has_tag_name(PROJECT_TAG))
        .flat_map(metrics_children)
}

// Exact, case-sensitive comparison on the `name` attribute; no patterns.
fn file_metrics<'a, 'input>(
    doc: &'a Document<'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants()
        .filter(move |n| n.has_tag_name(FILE_TAG) && n.attribute("name") == Some(name))
        .flat_map(metrics_children)
}

fn metrics_children<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|c| c.has_tag_name(METRICS_TAG))
}

fn read_counts(node: Node) -> MetricCounts {
    MetricCounts {
        conditionals: counter(node, "conditionals"),
        coveredconditionals: counter(node, "coveredconditionals"),
        statements: counter(node, "statements"),
        coveredstatements: counter(node, "coveredstatements"),
        methods: counter(node, "methods"),
        coveredmethods: counter(node, "coveredmethods"),
    }
}

/// Missing or non-numeric attributes count as zero.
fn counter(node: Node, attr: &str) -> u64 {
    node.attribute(attr)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
