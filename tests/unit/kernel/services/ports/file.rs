use super::*;
use crate::error::ErrorKind;

#[test]
fn backend_errors_map_onto_taxonomy() {
    let transport: ShellError = BackendError::Transport("connection refused".into()).into();
    assert_eq!(transport.kind(), ErrorKind::NetworkUnavailable);

    let app: ShellError = BackendError::Application("not found".into()).into();
    assert_eq!(app, ShellError::ApplicationError("not found".into()));
}
