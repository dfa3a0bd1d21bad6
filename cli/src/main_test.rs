use clap::CommandFactory;

use super::*;

#[test]
fn auth_failures_carry_the_login_hint() {
    let err = CliError::from(ApiError::SessionExpired);
    assert_eq!(
        err.to_string(),
        "session expired, please log in again\nrun `queuedesk login` to start a new session"
    );
    assert_eq!(format!("{err:?}"), err.to_string());
    assert!(err.is_auth_failure());
}

#[test]
fn other_failures_have_no_hint() {
    let err = CliError::from(ApiError::Status { status: 500, detail: None });
    assert_eq!(err.to_string(), "request failed with status 500");
}

#[test]
fn command_tree_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn qr_and_export_flags_parse() {
    let cli = Cli::try_parse_from(["queuedesk", "qr", "template-create", "Brand", "--color", "#FF0000"]).unwrap();
    assert!(matches!(cli.command, Command::Qr(QrCommand::TemplateCreate { ref name, .. }) if name == "Brand"));

    let cli = Cli::try_parse_from(["queuedesk", "token", "admin", "--export-dir", "/tmp/qr"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Token(TokenCommand::Admin { export_dir: Some(ref dir), .. }) if dir == Path::new("/tmp/qr")
    ));
}
