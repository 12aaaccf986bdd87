use indexmap::IndexSet;

use crate::error::{ConvertError, Result};

/// Classes currently being expanded, outermost first.
///
/// Re-entering one of them means the type graph is cyclic; recursion stops
/// there instead of running until the stack gives out.
#[derive(Debug, Default)]
pub struct OpenPath {
    open: IndexSet<String>,
}

impl OpenPath {
    pub fn enter(&mut self, class: &str) -> Result<()> {
        if self.open.contains(class) {
            let mut path: Vec<String> = self.open.iter().cloned().collect();
            path.push(class.to_string());
            return Err(ConvertError::StructuralExhaustion { class: class.to_string(), path });
        }
        self.open.insert(class.to_string());
        Ok(())
    }

    pub fn leave(&mut self) { self.open.pop(); }

    pub fn depth(&self) -> usize { self.open.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_reports_the_full_path() {
        let mut p = OpenPath::default();
        p.enter("A").unwrap();
        p.enter("B").unwrap();
        let err = p.enter("A").unwrap_err();
        match err {
            ConvertError::StructuralExhaustion { class, path } => {
                assert_eq!(class, "A");
                assert_eq!(path, ["A", "B", "A"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leaving_allows_siblings_to_reuse_a_class() {
        let mut p = OpenPath::default();
        p.enter("Root").unwrap();
        p.enter("Leaf").unwrap();
        p.leave();
        p.enter("Leaf").unwrap();
        assert_eq!(p.depth(), 2);
    }
}
