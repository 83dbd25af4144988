use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    todolist::tui::run().await
}
