use anyhow::Result;

pub mod demo;
pub mod landing;
pub mod track;
pub mod verify;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
