//! Image fixups: `noscript` fallbacks and lazy-loaded sources.
//!
//! Lazy-loading scripts leave a placeholder `<img>` in the markup and put
//! the real image either in a sibling `<noscript>` or in a `data-*`
//! attribute. Both are folded back into a plain `<img>` so the article keeps
//! its pictures.

use crate::dom::{Document, NodeId};
use crate::patterns::{B64_DATA_URL, IMAGE_EXTENSION, SRCSET_LIKE, SRC_LIKE};

use super::nodes::is_single_image;

/// Base64 payloads shorter than this are placeholders (a 1x1 gif and
/// the like), not real images.
const MIN_B64_IMAGE_LENGTH: usize = 133;

/// Drop images without any source-like attribute, then replace placeholder
/// images with the single image of a following `<noscript>`.
///
/// Source-like attributes of the placeholder that the `<noscript>` image
/// lacks are copied over, under a `data-old-` prefix when the name is
/// already taken.
pub fn unwrap_noscript_images(doc: &mut Document) {
    for img in doc.elements_by_tag_name(doc.root(), "img") {
        let has_source = doc.attrs(img).is_some_and(|attrs| {
            attrs.iter().any(|attr| {
                matches!(
                    attr.name.as_str(),
                    "src" | "srcset" | "data-src" | "data-srcset"
                ) || IMAGE_EXTENSION.is_match(&attr.value)
            })
        });
        if !has_source {
            doc.detach(img);
        }
    }

    for noscript in doc.elements_by_tag_name(doc.root(), "noscript") {
        if !is_single_image(doc, noscript) {
            continue;
        }
        let Some(previous) = doc.prev_element_sibling(noscript) else {
            continue;
        };
        if !is_single_image(doc, previous) {
            continue;
        }
        let Some(placeholder) = first_image(doc, previous) else {
            continue;
        };
        let Some(image) = first_image(doc, noscript) else {
            continue;
        };

        let copied: Vec<(String, String)> = doc
            .attrs(placeholder)
            .map(|attrs| {
                attrs
                    .iter()
                    .filter(|attr| !attr.value.is_empty())
                    .filter(|attr| {
                        attr.name == "src"
                            || attr.name == "srcset"
                            || IMAGE_EXTENSION.is_match(&attr.value)
                    })
                    .map(|attr| (attr.name.clone(), attr.value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (name, value) in copied {
            if doc.attr(image, &name) == Some(value.as_str()) {
                continue;
            }
            let name = if doc.has_attr(image, &name) {
                format!("data-old-{name}")
            } else {
                name
            };
            doc.set_attr(image, &name, value);
        }

        if let Some(replacement) = doc.first_element_child(noscript) {
            doc.replace(previous, replacement);
        }
    }
}

fn first_image(doc: &Document, node: NodeId) -> Option<NodeId> {
    if doc.has_tag(node, "img") {
        Some(node)
    } else {
        doc.elements_by_tag_name(node, "img").first().copied()
    }
}

/// Promote lazy-load attributes of `img`, `picture` and `figure` elements
/// under `root` to `src`/`srcset`.
///
/// Tiny base64 placeholders are dropped when another attribute points at a
/// real image. A `figure` without any image gets a new `<img>`.
pub fn fix_lazy_images(doc: &mut Document, root: NodeId) {
    for elem in doc.elements_by_tag_names(root, &["img", "picture", "figure"]) {
        let is_img = doc.has_tag(elem, "img");

        if is_img {
            drop_placeholder_src(doc, elem);
            let has_src = doc.attr(elem, "src").is_some_and(|src| !src.is_empty());
            let has_srcset = doc
                .attr(elem, "srcset")
                .is_some_and(|srcset| !srcset.is_empty() && srcset != "null");
            let lazy_class = doc.class_name(elem).to_lowercase().contains("lazy");
            if (has_src || has_srcset) && !lazy_class {
                continue;
            }
        }

        let promotions: Vec<(&'static str, String)> = doc
            .attrs(elem)
            .map(|attrs| {
                attrs
                    .iter()
                    .filter(|attr| !matches!(attr.name.as_str(), "src" | "srcset" | "alt"))
                    .filter_map(|attr| {
                        if SRCSET_LIKE.is_match(&attr.value) {
                            Some(("srcset", attr.value.clone()))
                        } else if SRC_LIKE.is_match(&attr.value) {
                            Some(("src", attr.value.clone()))
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        for (target, value) in promotions {
            if is_img || doc.has_tag(elem, "picture") {
                doc.set_attr(elem, target, value);
            } else if doc.elements_by_tag_names(elem, &["img", "picture"]).is_empty() {
                let img = doc.create_element("img");
                doc.set_attr(img, target, value);
                doc.append_child(elem, img);
            }
        }
    }
}

/// Remove a small base64 `src` when another attribute names an image file.
/// SVG payloads are left alone since they can be tiny and still real.
fn drop_placeholder_src(doc: &mut Document, img: NodeId) {
    let Some(src) = doc.attr(img, "src") else {
        return;
    };
    let Some(caps) = B64_DATA_URL.captures(src) else {
        return;
    };
    if caps.get(1).is_some_and(|mime| mime.as_str() == "image/svg+xml") {
        return;
    }
    let prefix_length = caps.get(0).map_or(0, |m| m.end());
    let payload_length = src.len() - prefix_length;
    let other_image = doc.attrs(img).is_some_and(|attrs| {
        attrs
            .iter()
            .any(|attr| attr.name != "src" && IMAGE_EXTENSION.is_match(&attr.value))
    });
    if other_image && payload_length < MIN_B64_IMAGE_LENGTH {
        doc.remove_attr(img, "src");
    }
}
