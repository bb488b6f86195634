use std::process::{Command, Output};
use tempfile::TempDir;

fn opsdeck_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_opsdeck"))
}

fn init_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();
    assert!(output.status.success());
    tmp
}

/// Pull the short id out of a "Created <kind> <id> - <title>" line.
fn created_id(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .nth(2)
        .unwrap_or_else(|| panic!("unexpected create output: {}", stdout))
        .to_string()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_init_creates_opsdeck_directory() {
    let tmp = TempDir::new().unwrap();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(tmp.path().join(".opsdeck").exists());
    assert!(tmp.path().join(".opsdeck/ops.db").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Already initialized"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Ada", "ada@example.com"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("opsdeck workspace"));
}

#[test]
fn test_employee_workflow() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "employee",
            "Ada Lovelace",
            "ada@example.com",
            "--department",
            "engineering",
            "--role",
            "Staff Engineer",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Ada Lovelace"));
    assert!(stdout.contains("engineering"));
    assert!(stdout.contains("page 1/1 (1 record)"));

    // Get by prefix
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "employee", &id])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Staff Engineer"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["update", "employee", &id, "--category", "sales"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "employee", &id, "--json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["department"], "sales");

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["delete", "employee", &id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("No records found."));
}

#[test]
fn test_invalid_enum_value_rejected() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "task", "Broken", "--status", "bogus"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Invalid task status"));
}

#[test]
fn test_task_assignment_workflow() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Grace Hopper", "grace@example.com"])
        .output()
        .unwrap();
    let employee_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "task",
            "Write release notes",
            "--assignee",
            &employee_id,
            "--due",
            "2026-12-01",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let task_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("Grace Hopper"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["unassign", &task_id, &employee_id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "task", &task_id, "--json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["assignee_ids"].as_array().unwrap().len(), 0);
}

#[test]
fn test_assign_twice_rejected() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Sam", "sam@example.com"])
        .output()
        .unwrap();
    let employee_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "task", "Review budget", "--assignee", &employee_id])
        .output()
        .unwrap();
    let task_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["assign", &task_id, &employee_id])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("already assigned"));
}

#[test]
fn test_delete_employee_cascades_assignments() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Kim", "kim@example.com"])
        .output()
        .unwrap();
    let employee_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "task", "Quarterly report", "--assignee", &employee_id])
        .output()
        .unwrap();
    let task_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["delete", "employee", &employee_id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // The task survives, the assignment does not.
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "task", &task_id, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["assignee_ids"].as_array().unwrap().len(), 0);
}

#[test]
fn test_load_warning_prints_without_error_prefix() {
    use opsdeck::storage::{DataService, Row, RowValue, SqliteService};

    let tmp = init_workspace();
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "task", "Ship the build"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // Corrupt the stored status so the next load degrades with a warning.
    let service = SqliteService::open(tmp.path()).unwrap();
    let rows = service.fetch_all("tasks", "created_at").unwrap();
    let id = rows[0]["id"].as_text().unwrap().to_string();
    let mut changes = Row::new();
    changes.insert("status".to_string(), RowValue::from("shipped"));
    service.update("tasks", &id, &changes).unwrap();
    drop(service);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Ship the build"));

    let stderr = stderr_of(&output);
    assert!(stderr.contains("Warning:"));
    assert!(stderr.contains("shipped"));
    assert!(!stderr.contains("Error:"));
}

#[test]
fn test_list_status_filter_and_search() {
    let tmp = init_workspace();

    for (title, status) in [
        ("Ship the build", "todo"),
        ("Fix the pipeline", "in_progress"),
        ("Archive old docs", "completed"),
    ] {
        let output = opsdeck_cmd()
            .current_dir(tmp.path())
            .args(["add", "task", title, "--status", status])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task", "--status", "completed"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Archive old docs"));
    assert!(!stdout.contains("Ship the build"));
    assert!(stdout.contains("(1 record)"));

    // Two statuses OR together
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task", "--status", "todo", "--status", "completed"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("(2 records)"));

    // Search is case-insensitive
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task", "--search", "PIPELINE"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Fix the pipeline"));
    assert!(stdout.contains("(1 record)"));
}

#[test]
fn test_overdue_bucket_excludes_terminal_records() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "task", "Lapsed and open", "--due", "2020-01-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "task",
            "Lapsed but done",
            "--due",
            "2020-01-01",
            "--status",
            "completed",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task", "--due", "overdue"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Lapsed and open"));
    assert!(!stdout.contains("Lapsed but done"));
}

#[test]
fn test_sort_missing_dates_first() {
    let tmp = init_workspace();

    for (title, due) in [
        ("Task June", Some("2026-06-01")),
        ("Task January", Some("2026-01-01")),
        ("Task Undated", None),
    ] {
        let mut args = vec!["add", "task", title];
        if let Some(due) = due {
            args.push("--due");
            args.push(due);
        }
        let output = opsdeck_cmd()
            .current_dir(tmp.path())
            .args(&args)
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "task", "--sort", "due_date"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    let undated = stdout.find("Task Undated").unwrap();
    let january = stdout.find("Task January").unwrap();
    let june = stdout.find("Task June").unwrap();
    assert!(undated < january);
    assert!(january < june);
}

#[test]
fn test_pagination() {
    let tmp = init_workspace();

    for i in 0..12 {
        let output = opsdeck_cmd()
            .current_dir(tmp.path())
            .args([
                "add",
                "employee",
                &format!("Employee {:02}", i),
                &format!("e{}@example.com", i),
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("page 1/2 (12 records)"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee", "--page", "1"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("page 2/2 (12 records)"));

    // A page index past the end clamps to the last page.
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee", "--page", "9"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("page 2/2 (12 records)"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee", "--page-size", "20"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("page 1/1 (12 records)"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee", "--page-size", "15"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_list_json_output() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "subscription", "CI Minutes", "BuildCo", "--cost", "4900"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "subscription", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["total_count"], 1);
    assert_eq!(parsed["records"][0]["service"], "CI Minutes");
    assert_eq!(parsed["records"][0]["cost_cents"], 4900);
}

#[test]
fn test_hide_column() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Lin", "lin@example.com"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee", "--hide", "email"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(!stdout.contains("EMAIL"));
    assert!(!stdout.contains("lin@example.com"));
    assert!(stdout.contains("Lin"));
}

#[test]
fn test_query_expression() {
    let tmp = init_workspace();

    for (issue, status) in [("Login broken", "open"), ("Invoice wrong", "resolved")] {
        let output = opsdeck_cmd()
            .current_dir(tmp.path())
            .args([
                "add",
                "ticket",
                issue,
                "--company",
                "Acme",
                "--status",
                status,
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["query", "ticket", "status:open"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Login broken"));
    assert!(!stdout.contains("Invoice wrong"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["query", "ticket", "invoice"])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Invoice wrong"));
    assert!(!stdout.contains("Login broken"));
}

#[test]
fn test_ticket_note_and_chat() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "ticket", "Payment stuck", "--company", "Globex"])
        .output()
        .unwrap();
    let ticket_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["ticket", "note", &ticket_id, "Escalated to billing"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["ticket", "chat", &ticket_id, "sam", "Looking into it now"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "ticket", &ticket_id])
        .output()
        .unwrap();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Escalated to billing"));
    assert!(stdout.contains("sam: Looking into it now"));

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["ticket", "history", &ticket_id, "--json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_document_share() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Noor", "noor@example.com"])
        .output()
        .unwrap();
    let employee_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "document", "Vendor contract", "--category", "contract"])
        .output()
        .unwrap();
    let document_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["share", &document_id, &employee_id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "document", &document_id, "--json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["shared_with"][0], "Noor");
}

#[test]
fn test_document_file_upload() {
    let tmp = init_workspace();
    std::fs::write(tmp.path().join("handbook.pdf"), b"pdf bytes").unwrap();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "document",
            "Handbook",
            "--file",
            "handbook.pdf",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let url = parsed["file_url"].as_str().unwrap();
    assert!(url.starts_with("file://"));
    assert!(tmp.path().join(".opsdeck/files/handbook.pdf").exists());
}

#[test]
fn test_update_clears_due_date() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "task", "Renew certs", "--due", "2026-09-15"])
        .output()
        .unwrap();
    let task_id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["update", "task", &task_id, "--due", "none"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["get", "task", &task_id, "--json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed["due_date"].is_null());
}

#[test]
fn test_delete_nonexistent_fails() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["delete", "task", "deadbeef", "--force"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Record not found"));
}

#[test]
fn test_delete_without_force_non_interactive_fails() {
    let tmp = init_workspace();

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["add", "employee", "Temp", "temp@example.com"])
        .output()
        .unwrap();
    let id = created_id(&output);

    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["delete", "employee", &id])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("--force"));

    // Still there
    let output = opsdeck_cmd()
        .current_dir(tmp.path())
        .args(["list", "employee"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).contains("Temp"));
}
