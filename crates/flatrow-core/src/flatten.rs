//! Key-path flattening: the reversible bridge between the nested graph
//! form and the store's flat property bag.

use crate::KEY_SEPARATOR;
use crate::error::CodecError;
use crate::property::{PropertyNode, PropertyValue};

/// Join a path prefix and one field segment into a flattened key.
///
/// Rejects segments that contain the separator token, since the joined
/// key could not be split back unambiguously.
pub fn join_key(prefix: &str, segment: &str) -> Result<String, CodecError> {
    let key = if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{segment}")
    };

    if segment.contains(KEY_SEPARATOR) {
        return Err(CodecError::KeyCollision {
            key,
            segment: segment.to_string(),
            separator: KEY_SEPARATOR,
        });
    }

    Ok(key)
}

/// Flatten a composite graph into `(key, leaf)` pairs, depth first, in
/// declaration order.
///
/// The root must be a composite; a bare leaf has no name to key it by.
pub fn flatten(root: &PropertyNode) -> Result<Vec<(String, PropertyValue)>, CodecError> {
    let mut out = Vec::new();
    walk(root, "", &mut out)?;
    Ok(out)
}

fn walk(
    node: &PropertyNode,
    prefix: &str,
    out: &mut Vec<(String, PropertyValue)>,
) -> Result<(), CodecError> {
    match node {
        PropertyNode::Value(value) => {
            if prefix.is_empty() {
                return Err(CodecError::ScalarRoot);
            }
            out.push((prefix.to_string(), value.clone()));
        }
        PropertyNode::Object(entries) => {
            for (name, child) in entries {
                let key = join_key(prefix, name)?;
                walk(child, &key, out)?;
            }
        }
    }
    Ok(())
}

/// Rebuild the nested graph from flattened `(key, leaf)` pairs.
///
/// Fails with [`CodecError::ShapeMismatch`] when the keys imply an
/// inconsistent structure, e.g. `a` as a leaf alongside `a__b`.
pub fn unflatten<I>(entries: I) -> Result<PropertyNode, CodecError>
where
    I: IntoIterator<Item = (String, PropertyValue)>,
{
    let mut root: Vec<(String, PropertyNode)> = Vec::new();

    for (key, value) in entries {
        insert(&mut root, &key, value)?;
    }

    Ok(PropertyNode::Object(root))
}

fn insert(
    root: &mut Vec<(String, PropertyNode)>,
    key: &str,
    value: PropertyValue,
) -> Result<(), CodecError> {
    let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    let mut current = root;

    for (i, segment) in segments.iter().enumerate() {
        let is_last = i + 1 == segments.len();
        let pos = current.iter().position(|(name, _)| name == segment);

        if is_last {
            // A leaf lands here; any existing entry under the same name
            // means the key set is inconsistent.
            if pos.is_some() {
                return Err(CodecError::ShapeMismatch {
                    key: key.to_string(),
                });
            }
            current.push(((*segment).to_string(), PropertyNode::Value(value)));
            break;
        }

        let idx = match pos {
            Some(idx) => idx,
            None => {
                current.push(((*segment).to_string(), PropertyNode::empty()));
                current.len() - 1
            }
        };

        let PropertyNode::Object(children) = &mut current[idx].1 else {
            return Err(CodecError::ShapeMismatch {
                key: segments[..=i].join(KEY_SEPARATOR),
            });
        };
        current = children;
    }

    Ok(())
}

///
/// TESTS
///
