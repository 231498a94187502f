//! The target site's markup and URL contract.
//!
//! Nothing here is versioned by the site. If the markup drifts, the
//! selector constants below are the only things that should need to change.

/// Default origin of the recipe site.
pub const DEFAULT_ORIGIN: &str = "https://onetsp.com";

/// Path of the sign-in page. Also used as the "still on sign-in" marker.
pub const SIGN_IN_PATH: &str = "/account/signin";

/// Banner the site shows after a rejected sign-in.
pub const FAILURE_BANNER: &str = "Incorrect email address or password.";

/// Name of the session cookie set after a successful sign-in.
pub const SESSION_COOKIE: &str = "s";

pub const EMAIL_FIELD: &str = r#"input[name="email"]"#;
pub const PASSWORD_FIELD: &str = r#"input[name="password"]"#;
pub const SUBMIT_CONTROL: &str = r#"input[type="submit"]"#;

/// Form field names used when the sign-in form is posted directly.
pub const EMAIL_PARAM: &str = "email";
pub const PASSWORD_PARAM: &str = "password";

// Listing page
pub const LISTING_ANCHORS: &str = "div.row ul li a";
pub const PAGINATION_ANCHORS: &str = "div.pagination ul li a";
pub const NEXT_PREFIX: &str = "Next";

// Detail page
pub const TITLE: &str = "div.page-header h1";
pub const INGREDIENTS: &str = "#ingredients ul.ingredients li.ingredient";
pub const INSTRUCTIONS: &str = "#instructions ol.method li.step";
pub const CITATION_ANCHOR: &str = r#"a[rel="cite"]"#;
pub const ANY_ANCHOR: &str = "a";
pub const VIEW_RECIPE_TEXT: &str = "View recipe";
pub const TAGS: &str = "#tagsList li a.tagname";
pub const TIME_BLOCKS: &str = "#times div";
pub const TIME_LABEL: &str = ".label";
pub const TOTAL_LABEL: &str = "Total";

/// URL builder for one deployment of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    origin: String,
}

impl Site {
    /// Create a site rooted at `origin` (scheme + host, optional port).
    /// A trailing slash is ignored.
    pub fn new(origin: impl Into<String>) -> Self {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }
        Self { origin }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn sign_in_url(&self) -> String {
        format!("{}{SIGN_IN_PATH}", self.origin)
    }

    /// Listing page URL. Pages are numbered from 1.
    pub fn listing_url(&self, page: u32) -> String {
        format!("{}/recipes/recent/{page}", self.origin)
    }

    /// Whether a browser ended up on (or back on) the sign-in page.
    pub fn is_sign_in_url(&self, url: &str) -> bool {
        url.contains(SIGN_IN_PATH)
    }

    /// Make a listing href absolute. Anything already starting with
    /// `http` is kept as-is; everything else is prefixed with the origin.
    pub fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{href}", self.origin)
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}
