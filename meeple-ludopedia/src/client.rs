use std::time::Duration;

use meeple_core::{DestinationCandidate, DestinationCatalog, DestinationError, OwnershipFlags, PlayWrite};

use crate::error::LudopediaError;
use crate::forms;

const BASE_URL: &str = "https://www.ludopedia.com.br";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const LOGIN_PATH: &str = "login";
const SEARCH_PATH: &str = "classes/ajax/aj_search.php";
const ADD_GAME_PATH: &str = "classes/jogo_usuario_ajax.php";
const ADD_PLAY_PATH: &str = "cadastra_partida";
const USER_PATH: &str = "usuario";

/// Authenticated Ludopedia web session.
///
/// The session lives in the client's cookie store; every request after
/// [`LudopediaClient::login`] is made as the logged-in user.
pub struct LudopediaClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl LudopediaClient {
    /// Log in and return the client together with the user's numeric id,
    /// when the landing page exposes it.
    pub fn login(email: &str, password: &str) -> Result<(Self, Option<String>), LudopediaError> {
        Self::login_at(BASE_URL, email, password)
    }

    pub fn login_at(
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<(Self, Option<String>), LudopediaError> {
        let client = Self::build(base_url)?;

        let resp = client
            .http
            .post(client.url(LOGIN_PATH))
            .form(&[("email", email), ("pass", password)])
            .send()?;
        let body = resp.text()?;

        if forms::is_bad_credentials(&body) {
            return Err(LudopediaError::AuthenticationFailed);
        }

        let user_id = forms::extract_login_user_id(&body);
        match &user_id {
            Some(id) => log::debug!("Logged in to Ludopedia as user {}", id),
            None => log::warn!("Logged in to Ludopedia, but the user id was not found"),
        }
        Ok((client, user_id))
    }

    /// A session without login, enough for public profile lookups.
    pub fn anonymous() -> Result<Self, LudopediaError> {
        Self::build(BASE_URL)
    }

    fn build(base_url: &str) -> Result<Self, LudopediaError> {
        let http = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn search(&self, query: &str) -> Result<Vec<DestinationCandidate>, LudopediaError> {
        let resp = self
            .http
            .get(self.url(SEARCH_PATH))
            .query(&forms::search_params(query))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LudopediaError::ServerError {
                endpoint: SEARCH_PATH,
                status: status.as_u16(),
            });
        }
        let body = resp.text()?;
        let candidates = forms::parse_search_response(&body)?;
        log::debug!("Search '{}' returned {} result(s)", query, candidates.len());
        Ok(candidates)
    }

    fn post_collection(&self, destination_id: &str, flags: OwnershipFlags) -> Result<(), LudopediaError> {
        let resp = self
            .http
            .post(self.url(ADD_GAME_PATH))
            .form(&forms::collection_form(destination_id, flags))
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LudopediaError::ServerError {
                endpoint: ADD_GAME_PATH,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn post_play(&self, play: &PlayWrite) -> Result<Option<String>, LudopediaError> {
        let resp = self
            .http
            .post(self.url(ADD_PLAY_PATH))
            .form(&forms::play_form(play))
            .send()?;
        let body = resp.text()?;
        Ok(forms::extract_play_id(&body))
    }

    fn profile_user_id(&self, username: &str) -> Result<Option<String>, LudopediaError> {
        let resp = self
            .http
            .get(format!("{}/{}", self.url(USER_PATH), username))
            .send()?;
        let body = resp.text()?;
        Ok(forms::extract_profile_user_id(&body))
    }
}

impl DestinationCatalog for LudopediaClient {
    fn search_games(&self, query: &str) -> Result<Vec<DestinationCandidate>, DestinationError> {
        Ok(self.search(query)?)
    }

    fn add_to_collection(
        &self,
        destination_id: &str,
        flags: OwnershipFlags,
    ) -> Result<(), DestinationError> {
        Ok(self.post_collection(destination_id, flags)?)
    }

    fn log_play(&self, play: &PlayWrite) -> Result<Option<String>, DestinationError> {
        Ok(self.post_play(play)?)
    }

    fn lookup_user_id(&self, username: &str) -> Result<Option<String>, DestinationError> {
        Ok(self.profile_user_id(username)?)
    }
}
