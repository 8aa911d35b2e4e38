use std::time::Duration;

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::json;

use project_dashboard::api::{ApiClient, ApiError, TokenStore};
use project_dashboard::controller::{Command, ListController, Status};
use project_dashboard::models::{
    Project, ProjectDraft, ProjectId, ProjectStatus, Task, TaskDraft, TaskId, TaskStatus,
};

fn client(server: &Server, token: Option<&str>) -> ApiClient {
    ApiClient::new(
        &server.url(),
        TokenStore::new(token.map(str::to_string)),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn lists_projects_with_token_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/project")
        .match_header("token", "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"projects":[
                {"_id":"p1","title":"Website","description":"Redesign","status":"active"},
                {"id":"p2","title":"Mobile","description":"App","status":"inactive"}
            ]}"#,
        )
        .create_async()
        .await;

    let projects = client(&server, Some("secret")).list_projects().await.unwrap();

    mock.assert_async().await;
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, ProjectId::from("p1"));
    assert_eq!(projects[1].id, ProjectId::from("p2"));
    assert_eq!(projects[1].status, ProjectStatus::Inactive);
}

#[tokio::test]
async fn omits_token_header_when_unset() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/project")
        .match_header("token", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let projects = client(&server, None).list_projects().await.unwrap();

    mock.assert_async().await;
    assert!(projects.is_empty());
}

#[tokio::test]
async fn lists_tasks_for_project() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/p1")
        .with_status(200)
        .with_body(
            r#"{"tasks":[
                {"_id":"t1","title":"Wireframes","description":"Draw","status":"inprogress",
                 "dueDate":"2030-03-04T00:00:00.000Z","projectId":{"_id":"p1","title":"Website"}},
                {"_id":"t2","title":"Copy","description":"Write","status":"blocked","projectId":"p1"}
            ]}"#,
        )
        .create_async()
        .await;

    let tasks = client(&server, None).list_tasks(&ProjectId::from("p1")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2030, 3, 4));
    assert_eq!(tasks[0].project_id, Some(ProjectId::from("p1")));
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    // Unknown statuses fall back to the first one.
    assert_eq!(tasks[1].status, TaskStatus::Todo);
    assert_eq!(tasks[1].due_date, None);
}

#[tokio::test]
async fn unreadable_records_do_not_sink_the_list() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/get/p1")
        .with_status(200)
        .with_body(
            r#"{"tasks":[
                {"title":"No id","description":"x","status":"todo"},
                {"_id":"t2","title":"Odd date","description":"y","status":"completed","dueDate":"03/09/2025"},
                {"_id":"t3","title":"Fine","description":"z","status":"todo","dueDate":"2030-01-01"}
            ]}"#,
        )
        .create_async()
        .await;

    let tasks = client(&server, None).list_tasks(&ProjectId::from("p1")).await.unwrap();

    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t2", "t3"]);
    assert_eq!(tasks[0].due_date, None);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert_eq!(tasks[1].due_date, NaiveDate::from_ymd_opt(2030, 1, 1));
}

#[tokio::test]
async fn creates_task_under_its_project() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/create/p1")
        .match_body(Matcher::Json(json!({
            "title": "Wireframes",
            "description": "Draw the screens",
            "status": "inprogress",
            "dueDate": "2030-03-04"
        })))
        .with_status(201)
        .with_body(r#"{"message":"Task created"}"#)
        .create_async()
        .await;

    let draft = TaskDraft {
        title: "Wireframes".into(),
        description: "Draw the screens".into(),
        status: TaskStatus::InProgress,
        due_date: NaiveDate::from_ymd_opt(2030, 3, 4),
        project_id: Some(ProjectId::from("p1")),
    };
    client(&server, None).create_task(&draft).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn create_task_without_project_never_hits_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client(&server, None)
        .create_task(&TaskDraft::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn updates_and_deletes_use_record_paths() {
    let mut server = Server::new_async().await;
    let update_project = server
        .mock("PUT", "/update/project/p1")
        .match_body(Matcher::PartialJson(json!({"status": "inactive"})))
        .with_status(200)
        .create_async()
        .await;
    let delete_project = server
        .mock("DELETE", "/delete/project/p1")
        .with_status(200)
        .create_async()
        .await;
    let update_task = server
        .mock("PUT", "/t1")
        .match_body(Matcher::PartialJson(json!({"status": "completed", "dueDate": "2030-01-01"})))
        .with_status(200)
        .create_async()
        .await;
    let delete_task = server
        .mock("DELETE", "/delete/t1")
        .with_status(200)
        .create_async()
        .await;

    let api = client(&server, Some("secret"));
    let project = Project {
        id: ProjectId::from("p1"),
        title: "Website".into(),
        description: "Redesign".into(),
        status: ProjectStatus::Inactive,
    };
    let task = Task {
        id: TaskId::from("t1"),
        title: "Wireframes".into(),
        description: "Draw".into(),
        status: TaskStatus::Completed,
        due_date: NaiveDate::from_ymd_opt(2030, 1, 1),
        project_id: Some(ProjectId::from("p1")),
    };

    api.update_project(&project).await.unwrap();
    api.delete_project(&project.id).await.unwrap();
    api.update_task(&task).await.unwrap();
    api.delete_task(&task.id).await.unwrap();

    update_project.assert_async().await;
    delete_project.assert_async().await;
    update_task.assert_async().await;
    delete_task.assert_async().await;
}

#[tokio::test]
async fn server_message_is_carried_in_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/create/project")
        .with_status(400)
        .with_body(r#"{"message":"Title already exists"}"#)
        .create_async()
        .await;

    let err = client(&server, None)
        .create_project(&ProjectDraft {
            title: "Website".into(),
            description: "Redesign".into(),
            status: ProjectStatus::Active,
        })
        .await
        .unwrap_err();

    match &err {
        ApiError::Server { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message.as_deref(), Some("Title already exists"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.message_or("Failed to save project"), "Title already exists");
}

#[tokio::test]
async fn controller_create_refreshes_list() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/create/project")
        .match_body(Matcher::Json(json!({
            "title": "Website",
            "description": "Redesign",
            "status": "active"
        })))
        .with_status(201)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/get/project")
        .with_status(200)
        .with_body(r#"[{"_id":"p1","title":"Website","description":"Redesign","status":"active"}]"#)
        .create_async()
        .await;

    let api = client(&server, None);
    let mut controller: ListController<Project> = ListController::new(Some(()));
    controller.begin_create();
    {
        let draft = controller.form_mut().unwrap().draft_mut();
        draft.title = "Website".into();
        draft.description = "Redesign".into();
    }
    let command = controller.submit();
    assert!(matches!(command, Some(Command::Create(_))));

    controller.run(&api, command).await;

    create.assert_async().await;
    list.assert_async().await;
    assert!(!controller.is_form_open());
    assert_eq!(controller.items().len(), 1);
    assert_eq!(controller.status().message(), Some("Project created successfully!"));
    assert!(matches!(controller.status(), Status::Success { .. }));
}

#[tokio::test]
async fn failed_fetch_falls_back_to_generic_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/get/p9")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let api = client(&server, None);
    let mut controller: ListController<Task> = ListController::new(None);
    let command = controller.select_scope(Some(ProjectId::from("p9")));
    controller.run(&api, command).await;

    assert_eq!(controller.status(), &Status::Error("Failed to fetch tasks".into()));
}
