use serde::{Deserialize, Serialize};

/// A node in the Figma document tree.
///
/// Node types outside the vocabulary we care about (TEXT, FRAME, COMPONENT,
/// GROUP, CANVAS, ...) are carried through as opaque strings so the
/// traversal never rejects a file over an unknown node kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignNode {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub name: String,
    /// Text content, present only on TEXT nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    pub fn is_text(&self) -> bool {
        self.node_type == "TEXT"
    }

    /// Containers whose name is usable as the enclosing-frame label in an
    /// extraction anchor.
    pub fn is_container(&self) -> bool {
        matches!(self.node_type.as_str(), "FRAME" | "COMPONENT" | "GROUP")
    }
}

/// The `GET /v1/files/{key}` response, reduced to the parts we read.
#[derive(Debug, Clone, Deserialize)]
pub struct FigmaFile {
    #[serde(default)]
    pub name: String,
    pub document: Option<DesignNode>,
}

impl FigmaFile {
    /// The page list (`document.children`), or an error if the response is
    /// missing the document tree.
    pub fn pages(&self) -> crate::Result<&[DesignNode]> {
        match &self.document {
            Some(doc) => Ok(&doc.children),
            None => Err(crate::FigrevError::UnexpectedResponse(
                "missing document.children".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_file() {
        let json = r#"{
            "name": "My File",
            "document": {
                "id": "0:0",
                "type": "DOCUMENT",
                "name": "Document",
                "children": [
                    {"id": "0:1", "type": "CANVAS", "name": "Page 1", "children": []}
                ]
            }
        }"#;
        let file: FigmaFile = serde_json::from_str(json).unwrap();
        let pages = file.pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "Page 1");
    }

    #[test]
    fn missing_document_is_an_error() {
        let file: FigmaFile = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(file.pages().is_err());
    }

    #[test]
    fn text_and_container_predicates() {
        let text = DesignNode {
            node_type: "TEXT".into(),
            ..Default::default()
        };
        let frame = DesignNode {
            node_type: "FRAME".into(),
            ..Default::default()
        };
        let vector = DesignNode {
            node_type: "VECTOR".into(),
            ..Default::default()
        };
        assert!(text.is_text());
        assert!(frame.is_container());
        assert!(!vector.is_text());
        assert!(!vector.is_container());
    }
}
