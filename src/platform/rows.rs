//! Row CRUD against the platform's `/rest/v1/{table}` surface. Filters are
//! equality-only, which is all the site needs; row-level security on the
//! platform decides what a given bearer may touch.

use crate::{errors::ApiError, platform::PlatformClient};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

fn table_path(table: &str) -> String {
    format!("/rest/v1/{table}")
}

fn eq_filters(filters: &[(&str, &str)]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(column, value)| ((*column).to_string(), format!("eq.{value}")))
        .collect()
}

impl PlatformClient {
    /// Inserts rows into a table.
    ///
    /// # Errors
    /// Returns an error when serialization fails, the request fails, or the
    /// platform rejects the insert.
    pub async fn insert_rows<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), ApiError> {
        let body = serde_json::to_value(rows)
            .map_err(|err| ApiError::Serialization(format!("Failed to encode rows: {err}")))?;

        let response = self
            .send_json(
                Method::POST,
                &table_path(table),
                &[],
                Some(&body),
                None,
                &[("Prefer", "return=minimal")],
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    /// Selects rows matching all equality filters.
    ///
    /// # Errors
    /// Returns an error when the request fails or the response cannot be
    /// decoded as a list of `T`.
    pub async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(eq_filters(filters));

        let response = self
            .send_json(Method::GET, &table_path(table), &query, None, None, &[])
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode rows: {err}")))
    }

    /// Applies a partial update to rows matching all equality filters.
    ///
    /// # Errors
    /// Returns an error when serialization fails, the request fails, or the
    /// platform rejects the update.
    pub async fn update_rows<T: Serialize>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        patch: &T,
    ) -> Result<(), ApiError> {
        let body: Value = serde_json::to_value(patch)
            .map_err(|err| ApiError::Serialization(format!("Failed to encode patch: {err}")))?;
        let query = eq_filters(filters);

        let response = self
            .send_json(
                Method::PATCH,
                &table_path(table),
                &query,
                Some(&body),
                None,
                &[("Prefer", "return=minimal")],
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    /// Deletes rows matching all equality filters.
    ///
    /// # Errors
    /// Returns an error when the request fails or the platform rejects the
    /// delete.
    pub async fn delete_rows(&self, table: &str, filters: &[(&str, &str)]) -> Result<(), ApiError> {
        let query = eq_filters(filters);

        let response = self
            .send_json(Method::DELETE, &table_path(table), &query, None, None, &[])
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::{PlatformClient, types::Booking};
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &MockServer) -> PlatformClient {
        PlatformClient::new(&server.uri(), SecretString::from("anon-key".to_string()))
            .expect("client should build")
    }

    fn booking() -> Booking {
        Booking {
            id: None,
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            check_in: "2026-09-10".to_string(),
            check_out: "2026-09-14".to_string(),
            guests: 2,
            status: "pending".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_rows_posts_array_with_prefer_header() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/bookings"))
            .and(header("apikey", "anon-key"))
            .and(header("Prefer", "return=minimal"))
            .and(body_json(json!([{
                "id": null,
                "name": "Jane",
                "email": "jane@x.com",
                "check_in": "2026-09-10",
                "check_out": "2026-09-14",
                "guests": 2,
                "status": "pending"
            }])))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        client_for(&server)
            .insert_rows("bookings", &[booking()])
            .await
            .expect("insert should succeed");
    }

    #[tokio::test]
    async fn select_rows_applies_equality_filters() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/bookings"))
            .and(query_param("select", "*"))
            .and(query_param("email", "eq.jane@x.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "b-1",
                "name": "Jane",
                "email": "jane@x.com",
                "check_in": "2026-09-10",
                "check_out": "2026-09-14",
                "guests": 2,
                "status": "confirmed"
            }])))
            .mount(&server)
            .await;

        let rows: Vec<Booking> = client_for(&server)
            .select_rows("bookings", &[("email", "jane@x.com")])
            .await
            .expect("select should succeed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "confirmed");
    }

    #[tokio::test]
    async fn update_rows_patches_filtered_rows() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/bookings"))
            .and(query_param("id", "eq.b-1"))
            .and(body_json(json!({"status": "cancelled"})))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        client_for(&server)
            .update_rows("bookings", &[("id", "b-1")], &json!({"status": "cancelled"}))
            .await
            .expect("update should succeed");
    }

    #[tokio::test]
    async fn delete_rows_requires_filters_to_match() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/messages"))
            .and(query_param("id", "eq.m-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        client_for(&server)
            .delete_rows("messages", &[("id", "m-1")])
            .await
            .expect("delete should succeed");
    }

    #[tokio::test]
    async fn select_rows_surfaces_platform_errors() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/bookings"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "JWT expired"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .select_rows::<Booking>("bookings", &[])
            .await
            .expect_err("select should fail");
        assert!(err.to_string().contains("JWT expired"));
    }
}
