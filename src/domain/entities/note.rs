/// Something a user asked Igor to remember
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub name: String,
    pub url: String,
    pub user: String,
}

impl Note {
    pub fn new(name: impl Into<String>, url: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user: user.into(),
        }
    }
}
