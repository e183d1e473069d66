use log::warn;
use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use sha2::{Digest, Sha256};

use crate::model::FrontMatter;

pub struct Extracted {
    pub front_matter: Option<FrontMatter>,
    pub body_offset: usize,
    pub digest: String,
}

/// Split a leading `---` YAML block off a document.
///
/// Only a block at the very start counts. Malformed YAML is tolerated: the
/// block is still skipped for the body but no pairs are returned.
pub fn extract(text: &str) -> Extracted {
    // pulldown-cmark reads `---\n---` as two thematic breaks
    if let Some(body_offset) = empty_block_end(text) {
        return Extracted {
            front_matter: Some(FrontMatter::new()),
            body_offset,
            digest: compute_digest(text),
        };
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut front_matter = None;
    let mut body_offset = 0;
    let mut in_block = false;
    let mut raw_yaml = String::new();

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                if range.start != 0 {
                    break;
                }
                in_block = true;
            }
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                front_matter = parse_pairs(&raw_yaml);
                body_offset = range.end;
                break;
            }
            Event::Text(cow) if in_block => raw_yaml.push_str(&cow),
            _ if in_block => {}
            _ => break,
        }
    }

    Extracted {
        front_matter,
        body_offset,
        digest: compute_digest(text),
    }
}

fn empty_block_end(text: &str) -> Option<usize> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;
    let after = rest.strip_prefix("---")?;
    let body = if after.is_empty() {
        after
    } else {
        after.strip_prefix("\r\n").or_else(|| after.strip_prefix('\n'))?
    };
    Some(text.len() - body.len())
}

pub fn compute_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text);
    format!("{:x}", hasher.finalize())
}

fn parse_pairs(yaml: &str) -> Option<FrontMatter> {
    let mapping = match serde_yaml::from_str::<serde_yaml::Value>(yaml) {
        Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
        Ok(serde_yaml::Value::Null) => return Some(FrontMatter::new()),
        Ok(_) => {
            warn!("front matter is not a key/value mapping, ignoring it");
            return None;
        }
        Err(e) => {
            warn!("malformed front matter: {}", e);
            return None;
        }
    };

    let pairs = mapping
        .into_iter()
        .filter_map(|(key, value)| Some((scalar_to_string(key)?, value_to_string(value))))
        .collect();
    Some(pairs)
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

fn value_to_string(value: serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Tagged(tagged) => value_to_string(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            // Nested values stay opaque, as compact JSON
            serde_json::to_string(&value).unwrap_or_default()
        }
        scalar => scalar_to_string(scalar).unwrap_or_default(),
    }
}
