use std::fmt;

/// Location of a menu level in the output-template hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePath(Vec<String>);

impl ScopePath {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Path one level below this one.
    pub fn child(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        names.push(name.to_string());
        Self(names)
    }

    /// Path next to this one, under the same parent.
    pub fn sibling(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        names.pop();
        names.push(name.to_string());
        Self(names)
    }

    /// Innermost scope name, empty for the root path.
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::ScopePath;

    #[test]
    fn unit_child_and_sibling_derive_new_paths() {
        let password = ScopePath::new(["login", "password"]);
        let mainloop = password.sibling("mainloop");
        let enable = mainloop.child("enable");

        assert_eq!(mainloop.to_string(), "login/mainloop");
        assert_eq!(enable.as_slice(), ["login", "mainloop", "enable"]);
        assert_eq!(enable.name(), "enable");
        assert_eq!(password.to_string(), "login/password");
    }

    #[test]
    fn regression_root_path_has_empty_name() {
        let root = ScopePath::default();
        assert_eq!(root.name(), "");
        assert!(root.as_slice().is_empty());
        assert_eq!(root.sibling("login").to_string(), "login");
    }
}
