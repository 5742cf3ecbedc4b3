use std::process::{Command, Output};

fn claimfield(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_claimfield"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .expect("failed to launch the claimfield binary")
}

#[test]
fn solo_square_route_prints_the_claimed_score() {
    let output = claimfield(&["--ticks", "120", "--bots", "0", "--route", "E30,S30,W30,N30"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("claimfield\n"), "{stdout}");
    assert!(stdout.contains("Your Score: 32\n"), "{stdout}");
    assert!(stdout.contains("final scoreboard after 120 ticks"), "{stdout}");
    assert!(!stdout.contains("GAME OVER!"), "{stdout}");

    let board_lines = stdout
        .lines()
        .skip(1)
        .take_while(|line| line.chars().all(|glyph| "a.+@".contains(glyph)))
        .count();
    assert_eq!(board_lines, 30, "one text row per board row");
}

#[test]
fn config_file_and_overrides_are_applied() {
    let output = claimfield(&["--config", "claimfield.toml", "--ticks", "200", "--bots", "2"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let standings = stdout
        .lines()
        .skip_while(|line| !line.starts_with("final scoreboard"))
        .skip(1)
        .count();
    assert_eq!(standings, 3, "player plus two bots: {stdout}");
}

#[test]
fn running_north_off_the_board_ends_the_game() {
    let output = claimfield(&["--ticks", "50", "--bots", "0", "--route", "N1"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.contains("GAME OVER!"), "{stdout}");
    assert!(stdout.contains("dead"), "{stdout}");
}

#[test]
fn malformed_route_is_reported() {
    let output = claimfield(&["--route", "Q5"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("invalid --route"), "{stderr}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = claimfield(&["--config", "does-not-exist.toml"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("failed to read config file"), "{stderr}");
}

#[test]
fn oversized_board_in_config_is_rejected() {
    let path = std::env::temp_dir().join(format!("claimfield-huge-{}.toml", std::process::id()));
    std::fs::write(&path, "board_width = 1e12\nboard_height = 1e12\n")
        .expect("failed to write config");
    let path_arg = path.to_str().expect("utf-8 temp path").to_owned();

    let output = claimfield(&["--config", &path_arg, "--ticks", "1"]);
    let _ = std::fs::remove_file(&path);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("invalid session configuration"), "{stderr}");
    assert!(stderr.contains("at most 1048576 cells"), "{stderr}");
}
