//! Batches of pre-serialized rows and their wire encoding

/// Rows flushed together as one stream load, tagged with a unique label
///
/// Rows are expected to be JSON objects already serialized by the producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    label: String,
    rows: Vec<String>,
    bytes: usize,
}

impl Batch {
    /// Create a batch; the byte-size hint is the sum of the row lengths.
    pub fn new(label: impl Into<String>, rows: Vec<String>) -> Self {
        let bytes = rows.iter().map(String::len).sum();
        Self {
            label: label.into(),
            rows,
            bytes,
        }
    }

    /// Create a batch labelled `<prefix><uuid>`
    pub fn with_generated_label(prefix: &str, rows: Vec<String>) -> Self {
        Self::new(generate_label(prefix), rows)
    }

    /// Override the byte-size hint computed from the rows
    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The request body for this batch, see [`encode`]
    pub fn payload(&self) -> Vec<u8> {
        encode(&self.rows)
    }
}

/// A fresh label: `prefix` followed by a random UUID
pub fn generate_label(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4())
}

/// Join rows into a single JSON array payload.
///
/// Rows are joined with `,` and wrapped in `[` and `]`. Row content is not
/// inspected.
///
/// ```
/// use stream_loader::batch::encode;
///
/// assert_eq!(encode::<&str>(&[]), b"[]");
/// assert_eq!(encode(&["a", "b"]), b"[a,b]");
/// ```
pub fn encode<S: AsRef<str>>(rows: &[S]) -> Vec<u8> {
    let size = rows.iter().map(|r| r.as_ref().len()).sum::<usize>() + rows.len() + 2;
    let mut payload = Vec::with_capacity(size);
    payload.push(b'[');
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            payload.push(b',');
        }
        payload.extend_from_slice(row.as_ref().as_bytes());
    }
    payload.push(b']');
    payload
}
