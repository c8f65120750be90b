use std::io::Write;

use anyhow::{Context, anyhow};
use tally_shared::{
    ApiError, AuthClient, BoardAction, SessionStore, TaskBoard, TaskClient, Transport, sign_in,
    sign_out,
};
use tracing::info;

use crate::cli::{Command, resolve_password};
use crate::render::Renderer;

/// Runs one command against the service.
#[tracing::instrument(skip_all)]
pub async fn dispatch<T, S, W>(
    transport: &T,
    session: &S,
    renderer: &Renderer,
    out: &mut W,
    command: Command,
) -> anyhow::Result<()>
where
    T: Transport,
    S: SessionStore,
    W: Write,
{
    match command {
        Command::Login { username, password } => {
            let password = resolve_password(password)?;
            let auth = AuthClient::new(transport);
            sign_in(&auth, session, &username, &password)
                .await
                .context("login failed")?;
            writeln!(out, "Logged in as {username}.")?;
        }
        Command::Signup { username, password } => {
            let password = resolve_password(password)?;
            AuthClient::new(transport)
                .signup(&username, &password)
                .await
                .context("signup failed")?;
            writeln!(
                out,
                "Registration successful! Run `tally login {username}` to sign in."
            )?;
        }
        Command::Logout => {
            sign_out(session)?;
            writeln!(out, "Logged out.")?;
        }
        Command::List { status, priority } => {
            let client = task_client(transport, session)?;
            let mut board = load_board(&client).await?;
            board.apply(BoardAction::SetStatusFilter(status));
            board.apply(BoardAction::SetPriorityFilter(priority));
            renderer.print_task_table(out, &board.visible())?;
        }
        Command::Add { text } => {
            let text = text.join(" ");
            let text = text.trim();
            if text.is_empty() {
                return Err(anyhow!("task text cannot be empty"));
            }
            let client = task_client(transport, session)?;
            let task = client.create(text).await.map_err(task_error)?;
            info!(task = %task.id, "task created");
            renderer.print_task(out, "Added", &task)?;
        }
        Command::Remove { id } => {
            let client = task_client(transport, session)?;
            client.remove(&id).await.map_err(task_error)?;
            info!(task = %id, "task removed");
            writeln!(out, "Removed {id}.")?;
        }
        Command::Toggle { id } => {
            let client = task_client(transport, session)?;
            let board = load_board(&client).await?;
            let status = board
                .next_status(&id)
                .ok_or_else(|| anyhow!("no task with id {id}"))?;
            let task = client.set_status(&id, status).await.map_err(task_error)?;
            renderer.print_task(out, "Updated", &task)?;
        }
        Command::Priority { id, level } => {
            let client = task_client(transport, session)?;
            let task = client.set_priority(&id, level).await.map_err(task_error)?;
            renderer.print_task(out, "Updated", &task)?;
        }
        Command::Edit { id, text } => {
            let client = task_client(transport, session)?;
            let board = load_board(&client).await?;
            if board.find(&id).is_none() {
                return Err(anyhow!("no task with id {id}"));
            }
            match board.text_edit(&id, &text.join(" ")) {
                Some(text) => {
                    let task = client.set_text(&id, &text).await.map_err(task_error)?;
                    renderer.print_task(out, "Updated", &task)?;
                }
                None => writeln!(out, "Nothing to change.")?,
            }
        }
    }

    Ok(())
}

fn task_client<'t, T, S>(transport: &'t T, session: &S) -> anyhow::Result<TaskClient<&'t T>>
where
    T: Transport,
    S: SessionStore,
{
    TaskClient::new(transport, session.get())
        .map_err(|error| anyhow::Error::new(error).context("run `tally login` first"))
}

async fn load_board<T: Transport>(client: &TaskClient<T>) -> anyhow::Result<TaskBoard> {
    let tasks = client.list().await.map_err(task_error)?;
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(tasks));
    Ok(board)
}

fn task_error(error: ApiError) -> anyhow::Error {
    if error.is_unauthorized() {
        anyhow::Error::new(error).context("session was rejected; run `tally login` again")
    } else {
        error.into()
    }
}
