use std::fmt;

use anyhow::Error as AnyError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kelarin_core::access::AccessError;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use tracing::error;

#[derive(Debug, Clone, Copy)]
struct ErrorDescriptor {
    status: StatusCode,
    name: &'static str,
    error_type: &'static str,
    default_message: &'static str,
}

const BAD_REQUEST_DESCRIPTOR: ErrorDescriptor = ErrorDescriptor {
    status: StatusCode::BAD_REQUEST,
    name: "BAD_REQUEST",
    error_type: "BAD_REQUEST",
    default_message: "Bad request.",
};

const UNAUTHORIZED_DESCRIPTOR: ErrorDescriptor = ErrorDescriptor {
    status: StatusCode::UNAUTHORIZED,
    name: "AUTHENTICATION_REQUIRED",
    error_type: "AUTHENTICATION_REQUIRED",
    default_message: "You must sign in first to access this resource.",
};

const CONFLICT_DESCRIPTOR: ErrorDescriptor = ErrorDescriptor {
    status: StatusCode::CONFLICT,
    name: "RESOURCE_ALREADY_EXISTS",
    error_type: "RESOURCE_ALREADY_EXISTS",
    default_message: "Resource already exists.",
};

const NOT_FOUND_DESCRIPTOR: ErrorDescriptor = ErrorDescriptor {
    status: StatusCode::NOT_FOUND,
    name: "NOT_FOUND",
    error_type: "RESOURCE_NOT_FOUND",
    default_message: "Resource not found.",
};

const FORBIDDEN_DESCRIPTOR: ErrorDescriptor = ErrorDescriptor {
    status: StatusCode::FORBIDDEN,
    name: "ACTION_FORBIDDEN",
    error_type: "ACTION_FORBIDDEN",
    default_message: "Action forbidden.",
};

const INTERNAL_SERVER_ERROR_DESCRIPTOR: ErrorDescriptor = ErrorDescriptor {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    name: "INTERNAL_SERVER_ERROR",
    error_type: "INTERNAL_SERVER_ERROR",
    default_message: "An internal error occurred.",
};

#[derive(Debug)]
pub struct AppError {
    descriptor: &'static ErrorDescriptor,
    name: String,
    error_type: String,
    message: String,
    data: Option<JsonValue>,
}

impl AppError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::from_descriptor(&BAD_REQUEST_DESCRIPTOR, Some(message.into()))
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::from_descriptor(&UNAUTHORIZED_DESCRIPTOR, Some(message.into()))
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::from_descriptor(&FORBIDDEN_DESCRIPTOR, Some(message.into()))
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::from_descriptor(&CONFLICT_DESCRIPTOR, Some(message.into()))
    }

    pub(crate) fn internal(error: AnyError) -> Self {
        error!(?error, "internal server error");
        Self::from_descriptor(&INTERNAL_SERVER_ERROR_DESCRIPTOR, None)
    }

    pub(crate) fn from_anyhow(error: AnyError) -> Self {
        Self::internal(error)
    }

    pub(crate) fn workspace_not_found(workspace_id: i64) -> Self {
        let message = format!("Workspace {workspace_id} not found.");

        Self::from_descriptor(&NOT_FOUND_DESCRIPTOR, Some(message))
            .with_name("WORKSPACE_NOT_FOUND")
            .with_data(json!({ "workspace_id": workspace_id }))
    }

    pub(crate) fn user_not_found(email: &str) -> Self {
        let email = email.to_owned();
        let message = format!("No user found with email {email}.");

        Self::from_descriptor(&NOT_FOUND_DESCRIPTOR, Some(message))
            .with_name("USER_NOT_FOUND")
            .with_data(json!({ "email": email }))
    }

    pub(crate) fn collaborator_not_found(workspace_id: i64, user_id: i64) -> Self {
        let message = format!("User {user_id} is not a collaborator of workspace {workspace_id}.");

        Self::from_descriptor(&NOT_FOUND_DESCRIPTOR, Some(message))
            .with_name("COLLABORATOR_NOT_FOUND")
            .with_data(json!({ "workspace_id": workspace_id, "user_id": user_id }))
    }

    pub(crate) fn list_not_found(list_id: i64) -> Self {
        let message = format!("Board list {list_id} not found.");

        Self::from_descriptor(&NOT_FOUND_DESCRIPTOR, Some(message))
            .with_name("LIST_NOT_FOUND")
            .with_data(json!({ "list_id": list_id }))
    }

    pub(crate) fn card_not_found(card_id: i64) -> Self {
        let message = format!("Card {card_id} not found.");

        Self::from_descriptor(&NOT_FOUND_DESCRIPTOR, Some(message))
            .with_name("CARD_NOT_FOUND")
            .with_data(json!({ "card_id": card_id }))
    }

    pub(crate) fn card_item_not_found(kind: &'static str, name: &'static str, id: i64) -> Self {
        let message = format!("{kind} {id} not found.");

        Self::from_descriptor(&NOT_FOUND_DESCRIPTOR, Some(message))
            .with_name(name)
            .with_data(json!({ "id": id }))
    }

    pub(crate) fn not_in_workspace(workspace_id: i64) -> Self {
        let message = format!("You are not associated with workspace {workspace_id}.");

        Self::from_descriptor(&FORBIDDEN_DESCRIPTOR, Some(message))
            .with_name("NOT_IN_WORKSPACE")
            .with_error_type("NO_PERMISSION")
            .with_data(json!({ "workspace_id": workspace_id }))
    }

    pub(crate) fn insufficient_role(workspace_id: i64, role: &str) -> Self {
        let role = role.to_owned();
        let message = format!("Your role '{role}' in workspace {workspace_id} does not permit this action.");

        Self::from_descriptor(&FORBIDDEN_DESCRIPTOR, Some(message))
            .with_name("INSUFFICIENT_WORKSPACE_ROLE")
            .with_error_type("NO_PERMISSION")
            .with_data(json!({ "workspace_id": workspace_id, "role": role }))
    }

    pub(crate) fn from_access(err: AccessError) -> Self {
        match err {
            AccessError::WorkspaceNotFound(workspace_id) => Self::workspace_not_found(workspace_id),
            AccessError::NotAssociated { workspace_id, .. } => Self::not_in_workspace(workspace_id),
            other => Self::internal(AnyError::new(other)),
        }
    }

    pub(crate) fn into_payload(self) -> (StatusCode, UserFriendlyPayload) {
        let AppError {
            descriptor,
            name,
            error_type,
            message,
            data,
        } = self;

        let status = descriptor.status;
        let (code, reason) = code_and_reason(status);
        let payload = UserFriendlyPayload {
            status: status.as_u16(),
            code,
            reason,
            error_type,
            name,
            message,
            data,
        };

        (status, payload)
    }

    fn from_descriptor(descriptor: &'static ErrorDescriptor, message: Option<String>) -> Self {
        Self {
            descriptor,
            name: descriptor.name.to_owned(),
            error_type: descriptor.error_type.to_owned(),
            message: message.unwrap_or_else(|| descriptor.default_message.to_owned()),
            data: None,
        }
    }

    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = error_type.into();
        self
    }

    pub(crate) fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }

    #[cfg(test)]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.descriptor.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, payload) = self.into_payload();
        (status, Json(payload)).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UserFriendlyPayload {
    pub(crate) status: u16,
    pub(crate) code: String,
    pub(crate) reason: String,
    #[serde(rename = "type")]
    pub(crate) error_type: String,
    pub(crate) name: String,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<JsonValue>,
}

fn code_and_reason(status: StatusCode) -> (String, String) {
    let reason = status
        .canonical_reason()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Status {}", status.as_u16()));

    let code = reason
        .chars()
        .map(|ch| match ch {
            'a'..='z' => ch.to_ascii_uppercase(),
            'A'..='Z' | '0'..='9' => ch,
            _ => '_',
        })
        .collect::<String>();

    (code, reason)
}
