use client_core::{
    Collaborators, ControllerOptions, MemoryPostRepository, PostRepository,
};
use shared::domain::{Post, UserId};

use super::*;
use crate::{
    console::testing::{scripted, SharedOutput},
    dialogs::{TerminalConfirmation, TerminalPostForm},
};

fn seeded_post(id: i64, title: &str) -> Post {
    Post {
        id: Some(PostId(id)),
        user_id: UserId(1),
        title: title.to_string(),
        body: "seeded".to_string(),
    }
}

fn shell_with(
    input: &str,
    repository: Arc<MemoryPostRepository>,
) -> (Shell, SharedOutput) {
    let (console, output) = scripted(input);
    let console = Arc::new(console);
    let notifier = Arc::new(TerminalNotifier::new(Arc::clone(&console)));
    let repository: Arc<dyn PostRepository> = repository;
    let controller = TableController::new(
        Collaborators {
            repository,
            forms: Arc::new(TerminalPostForm::new(Arc::clone(&console))),
            confirmations: Arc::new(TerminalConfirmation::new(Arc::clone(&console))),
            notifications: notifier.clone(),
        },
        ControllerOptions::default(),
    );
    (Shell::new(controller, console, notifier), output)
}

#[test]
fn parses_commands_and_aliases() {
    assert_eq!(parse_command("list"), Ok(ShellCommand::Reload));
    assert_eq!(parse_command("  R "), Ok(ShellCommand::Reload));
    assert_eq!(parse_command("edit 4"), Ok(ShellCommand::Edit(PostId(4))));
    assert_eq!(parse_command("rm 9"), Ok(ShellCommand::Delete(PostId(9))));
    assert_eq!(parse_command("page 3"), Ok(ShellCommand::Page(2)));
    assert_eq!(parse_command("page 0"), Ok(ShellCommand::Page(0)));
    assert_eq!(parse_command("size 10"), Ok(ShellCommand::Size(10)));
    assert_eq!(parse_command("q"), Ok(ShellCommand::Quit));
}

#[test]
fn reports_parse_errors() {
    assert_eq!(parse_command(""), Err(ParseError::Empty));
    assert_eq!(
        parse_command("frobnicate"),
        Err(ParseError::Unknown("frobnicate".to_string()))
    );
    assert_eq!(
        parse_command("edit"),
        Err(ParseError::MissingArgument("edit"))
    );
    assert_eq!(
        parse_command("delete x"),
        Err(ParseError::BadArgument {
            command: "delete",
            got: "x".to_string()
        })
    );
}

#[tokio::test]
async fn print_once_renders_loaded_table() {
    let repository = Arc::new(MemoryPostRepository::with_posts(vec![
        seeded_post(1, "first"),
        seeded_post(2, "second"),
    ]));
    let (mut shell, output) = shell_with("", repository);

    shell.print_once().await.expect("load");

    let text = output.text();
    assert!(text.contains("first"));
    assert!(text.contains("second"));
    assert!(text.contains("1 – 2 of 2"));
}

#[tokio::test]
async fn print_once_surfaces_load_failure() {
    let repository = Arc::new(MemoryPostRepository::new());
    repository.set_offline(true).await;
    let (mut shell, output) = shell_with("", repository);

    let err = shell.print_once().await.expect_err("offline");

    assert!(matches!(err, TableError::Fetch(_)));
    assert!(output.text().contains("[!!] Could not load posts"));
}

#[tokio::test]
async fn session_creates_and_deletes_posts() {
    let repository = Arc::new(MemoryPostRepository::with_posts(vec![seeded_post(
        1, "doomed",
    )]));
    let (mut shell, output) = shell_with(
        "add\n5\nhello\nworld\ndelete 1\ny\nbogus\nquit\n",
        Arc::clone(&repository),
    );
    shell.print_once().await.expect("load");

    shell.run().await;

    assert_eq!(shell.controller().in_flight(), 0);
    let server = repository.snapshot().await;
    assert_eq!(server.len(), 1);
    assert_eq!(server[0].id, Some(PostId(2)));
    assert_eq!(server[0].title, "hello");

    let text = output.text();
    assert!(text.contains("[..] Saving…"));
    assert!(text.contains("[ok] Post 2 created"));
    assert!(text.contains("[ok] Post 1 deleted"));
    assert!(text.contains("unknown command 'bogus'"));
}

#[tokio::test]
async fn editing_unknown_post_says_so() {
    let repository = Arc::new(MemoryPostRepository::new());
    let (mut shell, output) = shell_with("", repository);
    shell.print_once().await.expect("load");

    assert!(shell.execute(ShellCommand::Edit(PostId(42))).await);

    assert!(output.text().contains("no post with id 42"));
}

#[tokio::test]
async fn unsupported_page_size_is_reported() {
    let repository = Arc::new(MemoryPostRepository::new());
    let (mut shell, output) = shell_with("", repository);

    assert!(shell.execute(ShellCommand::Size(7)).await);
    assert!(!shell.execute(ShellCommand::Quit).await);

    assert!(output.text().contains("page size 7 is not one of [5, 10, 20]"));
}
