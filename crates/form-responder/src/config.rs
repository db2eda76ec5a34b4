const DEFAULT_ENDPOINT: &str = "http://localhost/your-path/your-php-file.php";
const DEFAULT_PAGE: &str = "chatbot";

/// Builder for [`FormResponderConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FormResponderConfigBuilder {
    endpoint: Option<String>,
    page: Option<String>,
}

impl FormResponderConfigBuilder {
    /// Creates a builder with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint to post messages to.
    ///
    /// The address is taken as is, it's not validated.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the value of the `page` discriminator field.
    #[inline]
    pub fn with_page<S: Into<String>>(mut self, page: S) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> FormResponderConfig {
        FormResponderConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            page: self.page.unwrap_or_else(|| DEFAULT_PAGE.to_string()),
        }
    }
}

/// Configuration for the form responder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormResponderConfig {
    pub(crate) endpoint: String,
    pub(crate) page: String,
}
