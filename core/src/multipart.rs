//! `multipart/form-data` payloads built from text fields.
//!
//! The boundary is a name-based UUID over the field contents, so encoding the
//! same fields twice produces byte-identical output.

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field. Repeated names are kept as separate parts.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn boundary(&self) -> String {
        let mut seed = Vec::new();
        for (name, value) in &self.fields {
            seed.extend_from_slice(name.as_bytes());
            seed.push(0);
            seed.extend_from_slice(value.as_bytes());
            seed.push(0);
        }
        format!("----axfetch{}", Uuid::new_v5(&Uuid::NAMESPACE_OID, &seed).simple())
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary())
    }

    pub fn encode(&self) -> Vec<u8> {
        let boundary = self.boundary();
        let mut out = String::new();
        for (name, value) in &self.fields {
            out.push_str("--");
            out.push_str(&boundary);
            out.push_str("\r\nContent-Disposition: form-data; name=\"");
            out.push_str(&escape_name(name));
            out.push_str("\"\r\n\r\n");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("--");
        out.push_str(&boundary);
        out.push_str("--\r\n");
        out.into_bytes()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.append(name, value);
        }
        form
    }
}

fn escape_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_writes_one_part_per_field_in_order() {
        let form: FormData = [("foo", "1"), ("bar", "two")].into_iter().collect();
        let boundary = form.boundary();
        let body = String::from_utf8(form.encode()).unwrap();
        let expected = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"foo\"\r\n\r\n1\r\n\
             --{boundary}\r\nContent-Disposition: form-data; name=\"bar\"\r\n\r\ntwo\r\n\
             --{boundary}--\r\n"
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn boundary_is_stable_for_equal_fields() {
        let a: FormData = [("k", "v")].into_iter().collect();
        let b: FormData = [("k", "v")].into_iter().collect();
        let c: FormData = [("k", "w")].into_iter().collect();
        assert_eq!(a.boundary(), b.boundary());
        assert_ne!(a.boundary(), c.boundary());
    }

    #[test]
    fn content_type_carries_boundary() {
        let form: FormData = [("k", "v")].into_iter().collect();
        assert_eq!(
            form.content_type(),
            format!("multipart/form-data; boundary={}", form.boundary())
        );
    }

    #[test]
    fn field_names_are_escaped() {
        let form: FormData = [("a\"b", "v")].into_iter().collect();
        let body = String::from_utf8(form.encode()).unwrap();
        assert!(body.contains("name=\"a%22b\""));
    }

    #[test]
    fn empty_form_still_closes() {
        let form = FormData::new();
        let body = String::from_utf8(form.encode()).unwrap();
        assert_eq!(body, format!("--{}--\r\n", form.boundary()));
    }
}
