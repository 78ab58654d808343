/// URL classification definitions for the frontier ledger
///
/// Every URL the crawler touches ends the run in exactly one of these classes.
use std::fmt;

/// Which kind of page a fetch was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// A listing page of the archive
    Archive,
    /// An article page
    Article,
}

/// The classification of a URL in the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlClass {
    /// Archive page fetched successfully
    ArchiveGood,

    /// Archive page that could not be fetched
    ArchiveProblematic,

    /// Article page fetched successfully
    ArticleGood,

    /// Article page that could not be fetched
    ArticleProblematic,

    /// Pre-loaded URL, never written during the run
    Known,

    /// Discovered in an article, not yet confirmed reachable from the archive
    New,
}

impl UrlClass {
    /// Returns the class recording a fetch for `role`
    pub fn for_fetch(role: PageRole, success: bool) -> Self {
        match (role, success) {
            (PageRole::Archive, true) => Self::ArchiveGood,
            (PageRole::Archive, false) => Self::ArchiveProblematic,
            (PageRole::Article, true) => Self::ArticleGood,
            (PageRole::Article, false) => Self::ArticleProblematic,
        }
    }

    /// Returns the role this class belongs to, if it records a fetch
    pub fn role(&self) -> Option<PageRole> {
        match self {
            Self::ArchiveGood | Self::ArchiveProblematic => Some(PageRole::Archive),
            Self::ArticleGood | Self::ArticleProblematic => Some(PageRole::Article),
            Self::Known | Self::New => None,
        }
    }

    /// Returns true if a URL in this class is excluded from `newURLs`
    pub fn excludes_new(&self) -> bool {
        !matches!(self, Self::New)
    }

    /// Returns true if this class records a failed fetch
    pub fn is_problematic(&self) -> bool {
        matches!(self, Self::ArchiveProblematic | Self::ArticleProblematic)
    }

    /// Returns the opposite outcome for the same role
    pub fn counterpart(&self) -> Option<Self> {
        match self {
            Self::ArchiveGood => Some(Self::ArchiveProblematic),
            Self::ArchiveProblematic => Some(Self::ArchiveGood),
            Self::ArticleGood => Some(Self::ArticleProblematic),
            Self::ArticleProblematic => Some(Self::ArticleGood),
            Self::Known | Self::New => None,
        }
    }

    /// Label written to the classification log
    pub fn label(&self) -> &'static str {
        match self {
            Self::ArchiveGood => "GOOD ARCHIVE URL",
            Self::ArchiveProblematic => "PROBLEMATIC ARCHIVE URL",
            Self::ArticleGood => "GOOD ARTICLE URL",
            Self::ArticleProblematic => "PROBLEMATIC ARTICLE URL",
            Self::Known => "KNOWN ARTICLE URL",
            Self::New => "NEW URL",
        }
    }

    /// Returns all classes in log order
    pub fn all() -> [Self; 6] {
        [
            Self::ArchiveGood,
            Self::ArchiveProblematic,
            Self::ArticleGood,
            Self::ArticleProblematic,
            Self::Known,
            Self::New,
        ]
    }
}

impl fmt::Display for UrlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
