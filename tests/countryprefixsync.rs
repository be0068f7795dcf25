use assert_cmd::Command;

/*-------------------------------------------------------------------------------------------------
  countryprefixsync Binary Tests
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Version
--------------------------------------------------------------------------------------*/

#[test]
fn command_version() {
    Command::cargo_bin("countryprefixsync")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

/*--------------------------------------------------------------------------------------
  Missing Required Input
--------------------------------------------------------------------------------------*/

#[test]
fn command_no_args_reports_missing_input() {
    Command::cargo_bin("countryprefixsync")
        .unwrap()
        .assert()
        .failure()
        .stdout("Prefix List ID or Name is missing in the input.\n");
}

#[test]
fn command_missing_name_reports_missing_input() {
    Command::cargo_bin("countryprefixsync")
        .unwrap()
        .arg("--prefix-list-id")
        .arg("pl-123")
        .assert()
        .failure()
        .stdout("Prefix List ID or Name is missing in the input.\n");
}

#[test]
fn command_missing_id_reports_missing_input() {
    Command::cargo_bin("countryprefixsync")
        .unwrap()
        .arg("--prefix-list-name")
        .arg("blocklist")
        .assert()
        .failure()
        .stdout("Prefix List ID or Name is missing in the input.\n");
}
