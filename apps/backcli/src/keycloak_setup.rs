use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use user_api::constants::{KEYCLOAK_REALM, KEYCLOAK_URL};

const KEYCLOAK_ADMIN_REALM: &str = "KEYCLOAK_ADMIN_REALM";
const KEYCLOAK_ADMIN_USER: &str = "KEYCLOAK_ADMIN_USER";
const KEYCLOAK_ADMIN_PASSWORD: &str = "KEYCLOAK_ADMIN_PASSWORD";

/// Roles on the realm-management client the API's service account needs
const SERVICE_ACCOUNT_ROLES: [&str; 2] = ["view-users", "manage-users"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientRepresentation {
    client_id: String,
    service_accounts_enabled: bool,
    direct_access_grants_enabled: bool,
    public_client: bool,
    protocol: String,
    standard_flow_enabled: bool,
}

#[derive(Debug, Serialize)]
struct NewRealmRole<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoleRepresentation {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecret {
    value: String,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: String,
}

/// What `keycloak-setup` produced, for printing.
pub struct SetupOutcome {
    pub client_id: String,
    pub client_secret: SecretString,
    pub moderator_role: String,
    pub created_client: bool,
    pub created_role: bool,
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    bail!("{what} failed ({status}): {body}")
}

/// Bootstraps a realm for the user API through the Keycloak admin REST API,
/// logging in as a realm administrator with the `admin-cli` client.
pub struct KeycloakSetup {
    base_url: String,
    realm: String,
    admin_realm: String,
    admin_user: String,
    admin_password: SecretString,
    http: Client,
}

impl KeycloakSetup {
    pub fn from_env() -> Result<Self> {
        let env_or = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            base_url: env_or(KEYCLOAK_URL, "http://localhost:18080")
                .trim_end_matches('/')
                .to_string(),
            realm: env_or(KEYCLOAK_REALM, "ITM"),
            admin_realm: env_or(KEYCLOAK_ADMIN_REALM, "master"),
            admin_user: env_or(KEYCLOAK_ADMIN_USER, "admin"),
            admin_password: SecretString::new(env_or(KEYCLOAK_ADMIN_PASSWORD, "admin")),
            http,
        })
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    fn admin_url(&self, tail: &str) -> String {
        format!("{}/admin/realms/{}/{}", self.base_url, self.realm, tail)
    }

    async fn admin_token(&self) -> Result<String> {
        let token_url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.admin_realm
        );

        let response = self
            .http
            .post(&token_url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", "admin-cli"),
                ("username", self.admin_user.as_str()),
                ("password", self.admin_password.expose_secret().as_str()),
            ])
            .send()
            .await
            .context("failed to request admin token")?;

        let token: TokenResponse = ensure_success(response, "admin login")
            .await?
            .json()
            .await
            .context("failed to parse token response")?;

        Ok(token.access_token)
    }

    async fn find_client(&self, token: &str, client_id: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.admin_url("clients"))
            .bearer_auth(token)
            .query(&[("clientId", client_id)])
            .send()
            .await
            .with_context(|| format!("failed to look up client {client_id}"))?;

        let clients: Vec<IdOnly> = ensure_success(response, "client lookup")
            .await?
            .json()
            .await
            .context("failed to parse clients response")?;

        Ok(clients.into_iter().next().map(|c| c.id))
    }

    async fn create_client(&self, token: &str, client_id: &str) -> Result<String> {
        let client = ClientRepresentation {
            client_id: client_id.to_string(),
            service_accounts_enabled: true,
            direct_access_grants_enabled: false,
            public_client: false,
            protocol: "openid-connect".to_string(),
            standard_flow_enabled: false,
        };

        let response = self
            .http
            .post(self.admin_url("clients"))
            .bearer_auth(token)
            .json(&client)
            .send()
            .await
            .context("failed to create client")?;

        let response = ensure_success(response, "client creation").await?;

        let from_location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|l| l.to_str().ok())
            .and_then(|l| l.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(String::from);

        match from_location {
            Some(id) => Ok(id),
            None => self
                .find_client(token, client_id)
                .await?
                .ok_or_else(|| anyhow!("client {client_id} was created but cannot be found")),
        }
    }

    async fn client_secret(&self, token: &str, client_uuid: &str) -> Result<SecretString> {
        let response = self
            .http
            .get(self.admin_url(&format!("clients/{client_uuid}/client-secret")))
            .bearer_auth(token)
            .send()
            .await
            .context("failed to get client secret")?;

        let secret: ClientSecret = ensure_success(response, "client secret retrieval")
            .await?
            .json()
            .await
            .context("failed to parse client secret")?;

        Ok(SecretString::new(secret.value))
    }

    /// The admin client of a realm is `master-realm` in master and
    /// `realm-management` everywhere else.
    async fn realm_management_client(&self, token: &str) -> Result<String> {
        let client_id = if self.realm == "master" {
            "master-realm"
        } else {
            "realm-management"
        };

        self.find_client(token, client_id)
            .await?
            .ok_or_else(|| anyhow!("{client_id} client not found in realm {}", self.realm))
    }

    async fn service_account_user(&self, token: &str, client_uuid: &str) -> Result<String> {
        let response = self
            .http
            .get(self.admin_url(&format!("clients/{client_uuid}/service-account-user")))
            .bearer_auth(token)
            .send()
            .await
            .context("failed to get service account user")?;

        let user: IdOnly = ensure_success(response, "service account lookup")
            .await?
            .json()
            .await
            .context("failed to parse service account user")?;

        Ok(user.id)
    }

    async fn grant_user_management(
        &self,
        token: &str,
        sa_user_id: &str,
        realm_mgmt_uuid: &str,
    ) -> Result<()> {
        let response = self
            .http
            .get(self.admin_url(&format!("clients/{realm_mgmt_uuid}/roles")))
            .bearer_auth(token)
            .send()
            .await
            .context("failed to list realm-management roles")?;

        let roles: Vec<RoleRepresentation> = ensure_success(response, "role listing")
            .await?
            .json()
            .await
            .context("failed to parse roles")?;

        let wanted: Vec<RoleRepresentation> = roles
            .into_iter()
            .filter(|r| SERVICE_ACCOUNT_ROLES.contains(&r.name.as_str()))
            .collect();

        if wanted.len() != SERVICE_ACCOUNT_ROLES.len() {
            bail!("realm-management roles {SERVICE_ACCOUNT_ROLES:?} not all present");
        }

        let response = self
            .http
            .post(self.admin_url(&format!(
                "users/{sa_user_id}/role-mappings/clients/{realm_mgmt_uuid}"
            )))
            .bearer_auth(token)
            .json(&wanted)
            .send()
            .await
            .context("failed to assign roles")?;

        ensure_success(response, "role assignment").await?;
        Ok(())
    }

    /// Returns `true` when the role had to be created.
    async fn ensure_realm_role(&self, token: &str, role: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.admin_url(&format!("roles/{role}")))
            .bearer_auth(token)
            .send()
            .await
            .context("failed to look up realm role")?;

        if response.status() != StatusCode::NOT_FOUND {
            ensure_success(response, "realm role lookup").await?;
            return Ok(false);
        }

        let response = self
            .http
            .post(self.admin_url("roles"))
            .bearer_auth(token)
            .json(&NewRealmRole {
                name: role,
                description: "May manage users through the user API",
            })
            .send()
            .await
            .context("failed to create realm role")?;

        ensure_success(response, "realm role creation").await?;
        Ok(true)
    }

    pub async fn setup(&self, client_id: &str, moderator_role: &str) -> Result<SetupOutcome> {
        tracing::info!(realm = %self.realm, admin_realm = %self.admin_realm, "authenticating with keycloak admin API");
        let token = self.admin_token().await?;

        let (client_uuid, created_client) = match self.find_client(&token, client_id).await? {
            Some(id) => (id, false),
            None => (self.create_client(&token, client_id).await?, true),
        };
        tracing::info!(client_id = %client_id, created = created_client, "service client ready");

        let realm_mgmt_uuid = self.realm_management_client(&token).await?;
        let sa_user_id = self.service_account_user(&token, &client_uuid).await?;
        self.grant_user_management(&token, &sa_user_id, &realm_mgmt_uuid)
            .await?;
        tracing::info!(roles = ?SERVICE_ACCOUNT_ROLES, "service account granted user management");

        let created_role = self.ensure_realm_role(&token, moderator_role).await?;
        tracing::info!(role = %moderator_role, created = created_role, "moderator realm role ready");

        let client_secret = self.client_secret(&token, &client_uuid).await?;

        Ok(SetupOutcome {
            client_id: client_id.to_string(),
            client_secret,
            moderator_role: moderator_role.to_string(),
            created_client,
            created_role,
        })
    }
}
