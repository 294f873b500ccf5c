use std::fmt;

/**
 * 条件付き確率の文脈 (直前の単語列)。
 * 空の文脈は unigram 用に予約されている。
 */
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context(Vec<String>);

impl Context {
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Context {
        Context(tokens.iter().map(|t| t.as_ref().to_string()).collect())
    }

    /// unigram (文脈なし) のキー。
    pub fn empty() -> Context {
        Context(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Context {
    fn from(tokens: Vec<String>) -> Self {
        Context(tokens)
    }
}

impl From<&[&str]> for Context {
    fn from(tokens: &[&str]) -> Self {
        Context::new(tokens)
    }
}

impl<const N: usize> From<[&str; N]> for Context {
    fn from(tokens: [&str; N]) -> Self {
        Context::new(&tokens)
    }
}

impl<S: Into<String>> FromIterator<S> for Context {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Context(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(" "))
    }
}
