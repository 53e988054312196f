use crate::foundation::core::Rect;
use crate::foundation::error::{WeaveError, WeaveResult};

/// Stable index of an element in a [`PageDoc`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// One element of the page snapshot.
///
/// Geometry is in document coordinates (viewport-relative positions are
/// derived by subtracting the scroll offset), so rects stay put while
/// the page scrolls.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ElementNode {
    pub id: ElementId,
    #[serde(default)]
    pub parent: Option<ElementId>,
    #[serde(default = "default_tag")]
    pub tag: String,
    /// The HTML id attribute, when present.
    #[serde(default)]
    pub dom_id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub rect: Rect,
    #[serde(default)]
    pub text: Option<String>,
    /// Meaningful for `img` elements: already loaded-or-errored.
    #[serde(default)]
    pub image_complete: bool,
    /// Content width for horizontally scrollable containers.
    #[serde(default)]
    pub scroll_width: f64,
}

fn default_tag() -> String {
    "div".to_string()
}

/// Seed for inserting an element programmatically.
#[derive(Clone, Debug)]
pub struct ElementSeed {
    tag: String,
    dom_id: Option<String>,
    classes: Vec<String>,
    rect: Rect,
    parent: Option<ElementId>,
    text: Option<String>,
    image_complete: bool,
    scroll_width: f64,
}

impl ElementSeed {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            dom_id: None,
            classes: Vec::new(),
            rect: Rect::ZERO,
            parent: None,
            text: None,
            image_complete: false,
            scroll_width: 0.0,
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn dom_id(mut self, id: impl Into<String>) -> Self {
        self.dom_id = Some(id.into());
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, x + width, y + height);
        self
    }

    pub fn parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn image_complete(mut self, complete: bool) -> Self {
        self.image_complete = complete;
        self
    }

    pub fn scroll_width(mut self, width: f64) -> Self {
        self.scroll_width = width;
        self
    }
}

/// Pure-data snapshot of the page an effects session runs against.
///
/// Built programmatically or deserialized from JSON; every controller
/// query (class lookup, ancestor walk, geometry) goes through here, so
/// sessions run without a live rendering environment.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PageDoc {
    nodes: Vec<ElementNode>,
}

impl PageDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> WeaveResult<Self> {
        let doc: PageDoc =
            serde_json::from_str(json).map_err(|e| WeaveError::serde(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn validate(&self) -> WeaveResult<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.0 as usize != index {
                return Err(WeaveError::validation(format!(
                    "element id {} does not match its position {index}",
                    node.id.0
                )));
            }
            if let Some(parent) = node.parent {
                if parent == node.id {
                    return Err(WeaveError::validation("element cannot be its own parent"));
                }
                if parent.0 as usize >= self.nodes.len() {
                    return Err(WeaveError::validation(format!(
                        "element {} references missing parent {}",
                        node.id.0, parent.0
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, seed: ElementSeed) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(ElementNode {
            id,
            parent: seed.parent,
            tag: seed.tag,
            dom_id: seed.dom_id,
            classes: seed.classes,
            rect: seed.rect,
            text: seed.text,
            image_complete: seed.image_complete,
            scroll_width: seed.scroll_width,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|n| n.rect)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.rect = rect;
        }
    }

    pub fn set_scroll_width(&mut self, id: ElementId, width: f64) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.scroll_width = width;
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.classes.iter().any(|c| c == class))
            .map(|n| n.id)
            .collect()
    }

    pub fn first_by_class(&self, class: &str) -> Option<ElementId> {
        self.find_by_class(class).into_iter().next()
    }

    /// Elements whose HTML id contains `fragment` (`[id*="..."]`).
    pub fn find_id_contains(&self, fragment: &str) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.dom_id.as_deref().is_some_and(|id| id.contains(fragment)))
            .map(|n| n.id)
            .collect()
    }

    pub fn children_of(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.parent == Some(id))
            .map(|n| n.id)
            .collect()
    }

    pub fn first_child(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.iter().find(|n| n.parent == Some(id)).map(|n| n.id)
    }

    /// First child whose tag is one of `tags`, in document order.
    pub fn child_with_tag_in(&self, id: ElementId, tags: &[&str]) -> Option<ElementId> {
        self.nodes
            .iter()
            .find(|n| n.parent == Some(id) && tags.contains(&n.tag.as_str()))
            .map(|n| n.id)
    }

    /// First descendant of `root` (excluding `root`) with `tag`, in
    /// document order.
    pub fn descendant_with_tag(&self, root: ElementId, tag: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.tag == tag && n.id != root)
            .find(|n| self.is_descendant_of(n.id, root))
            .map(|n| n.id)
    }

    fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = self.get(id).and_then(|n| n.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// The document root: the first element without a parent.
    pub fn root(&self) -> Option<ElementId> {
        self.nodes.iter().find(|n| n.parent.is_none()).map(|n| n.id)
    }

    /// Nearest ancestor (including `id` itself) carrying `class`.
    pub fn closest_with_class(&self, id: ElementId, class: &str) -> Option<ElementId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.get(current)?.parent;
        }
        None
    }

    pub fn reparent(&mut self, child: ElementId, new_parent: ElementId) {
        if child == new_parent {
            return;
        }
        if let Some(node) = self.nodes.get_mut(child.0 as usize) {
            node.parent = Some(new_parent);
        }
    }

    /// All `img` elements, in document order.
    pub fn images(&self) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.tag == "img")
            .map(|n| n.id)
            .collect()
    }

    pub fn is_image_complete(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|n| n.image_complete)
    }

    pub fn set_image_complete(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.image_complete = true;
        }
    }

    /// Split an element's text into one addressable child per
    /// non-whitespace character, subdividing its rect horizontally.
    /// Returns the new children (empty when there is no text).
    pub fn split_text_chars(&mut self, id: ElementId) -> Vec<ElementId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let rect = node.rect;
        let chars: Vec<char> = node
            .text
            .clone()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let slice_width = rect.width() / chars.len() as f64;
        chars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let x = rect.x0 + slice_width * i as f64;
                self.insert(
                    ElementSeed::new("span")
                        .class("char")
                        .parent(id)
                        .text(c.to_string())
                        .rect(x, rect.y0, slice_width, rect.height()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/model.rs"]
mod tests;
