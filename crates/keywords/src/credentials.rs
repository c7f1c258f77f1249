use std::fmt;

pub const ENV_DEVELOPER_TOKEN: &str = "GOOGLE_ADS_DEVELOPER_TOKEN";
pub const ENV_CLIENT_ID: &str = "GOOGLE_ADS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_ADS_CLIENT_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "GOOGLE_ADS_REFRESH_TOKEN";
pub const ENV_LOGIN_CUSTOMER_ID: &str = "GOOGLE_ADS_LOGIN_CUSTOMER_ID";
pub const ENV_CUSTOMER_ID: &str = "GOOGLE_ADS_CUSTOMER_ID";

/// The six values that gate the live provider.
pub const REQUIRED_ENV: [&str; 6] = [
    ENV_DEVELOPER_TOKEN,
    ENV_CLIENT_ID,
    ENV_CLIENT_SECRET,
    ENV_REFRESH_TOKEN,
    ENV_LOGIN_CUSTOMER_ID,
    ENV_CUSTOMER_ID,
];

/// OAuth client, refresh token and account identifiers for the Google Ads API.
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleAdsCredentials {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub login_customer_id: String,
    pub customer_id: String,
}

impl GoogleAdsCredentials {
    /// Read all six values from the process environment. Returns `None` when
    /// any of them is unset or empty; whitespace counts as a value.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Some(Self {
            developer_token: get(ENV_DEVELOPER_TOKEN)?,
            client_id: get(ENV_CLIENT_ID)?,
            client_secret: get(ENV_CLIENT_SECRET)?,
            refresh_token: get(ENV_REFRESH_TOKEN)?,
            login_customer_id: digits_only(&get(ENV_LOGIN_CUSTOMER_ID)?),
            customer_id: digits_only(&get(ENV_CUSTOMER_ID)?),
        })
    }
}

/// True when every variable in [`REQUIRED_ENV`] is set and non-empty.
pub fn has_google_ads_env() -> bool {
    GoogleAdsCredentials::from_env().is_some()
}

// Customer ids are often written as 123-456-7890; the API wants bare digits.
fn digits_only(id: &str) -> String {
    id.chars().filter(char::is_ascii_digit).collect()
}

impl fmt::Debug for GoogleAdsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleAdsCredentials")
            .field("developer_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("login_customer_id", &self.login_customer_id)
            .field("customer_id", &self.customer_id)
            .finish()
    }
}
