use crate::harvest::ResultRow;

/// Case-insensitive include/exclude substring filter.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            include: normalize(include),
            exclude: normalize(exclude),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn matches_text(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        let included =
            self.include.is_empty() || self.include.iter().any(|t| haystack.contains(t));
        included && !self.exclude.iter().any(|t| haystack.contains(t))
    }

    /// Rows that carry an error always pass.
    pub fn matches(&self, row: &ResultRow) -> bool {
        if !row.error.is_empty() {
            return true;
        }
        self.matches_text(&format!("{} {} {}", row.title, row.company, row.snippet))
    }

    pub fn apply(&self, rows: Vec<ResultRow>) -> Vec<ResultRow> {
        if self.is_empty() {
            return rows;
        }
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

fn normalize<T>(terms: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
