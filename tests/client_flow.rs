//! The client layer driven through the crate's public surface, the way the
//! `taskctl` front end uses it.

use std::sync::Arc;

use taskboard::api::{app, AppState};
use taskboard::client::{
    DeleteOutcome, Navigation, NotificationKind, Notifications, PendingEdit, StatusEdit,
    TaskBoard, TaskClient, TaskForm,
};
use taskboard::task::TaskStatus;
use taskboard::Config;

async fn spawn_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = app(Arc::new(AppState::new(Config::new("memory://"))));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn add_edit_status_delete() {
    let client = TaskClient::new(spawn_api().await);
    let notifications = Notifications::new();

    let mut form = TaskForm::create("Pay rent", "Transfer", "2025-06-01", TaskStatus::Pending);
    let flash = match form.submit(&client).await {
        Navigation::ToList(flash) => flash,
        Navigation::Stay => panic!("create failed: {:?}", form.error),
    };

    let mut board = TaskBoard::mount(client.clone(), notifications.clone()).await;
    board.consume_flash(Some(flash)).await;
    let id = board.tasks()[0].id;

    let mut form = TaskForm::load(&client, &id.to_string()).await.expect("load");
    form.title = "Pay rent early".to_string();
    assert!(matches!(form.submit(&client).await, Navigation::ToList(_)));

    let edit: PendingEdit = board
        .begin_status_change(id, TaskStatus::Completed)
        .expect("task on board");
    assert_eq!(edit.previous, TaskStatus::Pending);
    let result = client.update_status(id, TaskStatus::Completed).await;
    assert_eq!(
        board.finish_status_change(edit, result).await,
        StatusEdit::Committed
    );

    assert_eq!(board.delete(id, &|_: &str| true).await, DeleteOutcome::Deleted);
    assert!(client.list().await.expect("list").is_empty());

    let messages: Vec<String> = notifications
        .active()
        .await
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Success)
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Task created successfully!",
            "Status updated to Completed",
            "Task deleted successfully!",
        ]
    );
}
