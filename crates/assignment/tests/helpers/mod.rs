use std::{path::PathBuf, str::FromStr};

use repdesk_directory::{Directory, DoctorInput, ProductInput, RepresentativeInput};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<repdesk_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    repdesk_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(repdesk_shared::State::single(pool))
}

/// Same pool layout as the server: writes go through a single connection.
pub async fn setup_server_state(path: PathBuf) -> anyhow::Result<repdesk_shared::State> {
    let state = setup_test_state(path.to_owned()).await?;
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?;
    let write_db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;

    Ok(repdesk_shared::State {
        read_db: state.read_db,
        write_db,
    })
}

pub struct Fixture {
    pub representative: String,
    pub doctors: Vec<String>,
    pub products: Vec<String>,
}

pub async fn create_fixture(
    state: &repdesk_shared::State,
    representative: &str,
) -> anyhow::Result<Fixture> {
    let directory = Directory(state.clone());

    let representative = directory
        .create_representative(RepresentativeInput {
            full_name: representative.to_owned(),
            email: format!("{}@field.localhost", representative.to_lowercase()),
            ..Default::default()
        })
        .await?;

    let mut doctors = vec![];
    for name in ["Dr Grey", "Dr House"] {
        doctors.push(
            directory
                .create_doctor(DoctorInput {
                    full_name: name.to_owned(),
                    ..Default::default()
                })
                .await?,
        );
    }

    let mut products = vec![];
    for name in ["Aortix", "Vasoline"] {
        products.push(
            directory
                .create_product(ProductInput {
                    name: name.to_owned(),
                    ..Default::default()
                })
                .await?,
        );
    }

    Ok(Fixture {
        representative,
        doctors,
        products,
    })
}
