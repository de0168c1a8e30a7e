use std::sync::Arc;

use clap::{Arg, ArgMatches, Command};
use tracing::{error, info};

use davtags::config::Config;
use davtags::dav::{DavClient, DavTransport};
use davtags::events::{BroadcastNotifier, Notifier};
use davtags::tags::{
    AssociationRepository, CreateTag, ObjectRef, RestApi, TagRepository,
};
use davtags::Result;

fn tag_id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_name("ID")
        .help("Tag id")
        .value_parser(clap::value_parser!(i64))
}

async fn run(config: &Config, matches: &ArgMatches) -> Result<()> {
    let dav = Arc::new(DavClient::new(
        &config.endpoint,
        config.dav_root(),
        &config.username,
        &config.password,
    )?) as Arc<dyn DavTransport>;
    let notifier = Arc::new(BroadcastNotifier::new(16)) as Arc<dyn Notifier>;

    let tags = TagRepository::new(dav.clone(), notifier);
    let associations = AssociationRepository::new(dav);

    match matches.subcommand() {
        Some(("list", _)) => {
            for tag in tags.list_tags().await? {
                println!(
                    "{}\t{}\tvisible={}\tassignable={}\tcolor={}",
                    tag.id,
                    tag.display_name,
                    tag.user_visible,
                    tag.user_assignable,
                    tag.color.as_deref().unwrap_or("-"),
                );
            }
        }
        Some(("get", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let tag = tags.get_tag(id).await?;
            println!("{}", serde_json::to_string_pretty(&tag)?);
        }
        Some(("create", sub)) => {
            let name = sub.get_one::<String>("name").cloned().unwrap_or_default();
            let mut tag = CreateTag::new(name);
            tag.color = sub.get_one::<String>("color").cloned();
            tag.user_visible = !sub.get_flag("invisible");
            tag.user_assignable = !sub.get_flag("unassignable");

            let id = tags.create_tag(&tag).await?;
            info!("Created tag #{}", id);
            println!("{id}");
        }
        Some(("rename", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let name = sub.get_one::<String>("name").cloned().unwrap_or_default();

            let mut tag = tags.get_tag(id).await?;
            tag.display_name = name;
            tags.update_tag(&tag).await?;
            info!("Renamed tag #{}", id);
        }
        Some(("delete", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let tag = tags.get_tag(id).await?;
            tags.delete_tag(&tag).await?;
            info!("Deleted tag #{}", id);
        }
        Some(("objects", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let kind = sub.get_one::<String>("type").cloned().unwrap_or_default();

            let tag = tags.get_tag(id).await?;
            let set = associations.get_objects(&tag, &kind).await?;
            info!("Association set etag: {}", set.etag);
            for object in set.objects {
                println!("{object}");
            }
        }
        Some(("assign", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let kind = sub.get_one::<String>("type").cloned().unwrap_or_default();
            let objects: Vec<ObjectRef> = sub
                .get_many::<String>("object")
                .unwrap_or_default()
                .map(|object_id| ObjectRef::new(object_id.clone(), "file"))
                .collect();

            let tag = tags.get_tag(id).await?;
            // read first so the write carries the current concurrency token
            let current = associations.get_objects(&tag, &kind).await?;
            associations
                .set_objects(&tag, &kind, &objects, &current.etag)
                .await?;
            info!("Replaced {} association(s) of tag #{}", objects.len(), id);
        }
        Some(("restrict", sub)) => {
            let enabled = sub.get_one::<String>("enabled").map(String::as_str) == Some("1");
            let rest = RestApi::new(&config.endpoint, &config.username, &config.password)?;
            rest.set_creation_restricted_to_admin(enabled).await?;
            info!("Tag creation restricted to admin: {}", enabled);
        }
        _ => {
            error!("No subcommand given, see --help");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("davtags")
        .version("0.1")
        .about("System tag vocabulary client")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .subcommand(Command::new("list").about("List all tags"))
        .subcommand(Command::new("get").about("Show one tag").arg(tag_id_arg()))
        .subcommand(
            Command::new("create")
                .about("Create a tag")
                .arg(Arg::new("name").required(true).value_name("NAME"))
                .arg(Arg::new("color").long("color").value_name("HEX"))
                .arg(
                    Arg::new("invisible")
                        .long("invisible")
                        .action(clap::ArgAction::SetTrue)
                        .help("Hide the tag from regular users"),
                )
                .arg(
                    Arg::new("unassignable")
                        .long("unassignable")
                        .action(clap::ArgAction::SetTrue)
                        .help("Forbid regular users from attaching the tag"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a tag")
                .arg(tag_id_arg())
                .arg(Arg::new("name").required(true).value_name("NAME")),
        )
        .subcommand(Command::new("delete").about("Delete a tag").arg(tag_id_arg()))
        .subcommand(
            Command::new("objects")
                .about("List the objects a tag is attached to")
                .arg(tag_id_arg())
                .arg(Arg::new("type").long("type").default_value("files")),
        )
        .subcommand(
            Command::new("assign")
                .about("Replace the objects a tag is attached to")
                .arg(tag_id_arg())
                .arg(Arg::new("object").num_args(0..).value_name("OBJECT_ID"))
                .arg(Arg::new("type").long("type").default_value("files")),
        )
        .subcommand(
            Command::new("restrict")
                .about("Restrict tag creation to administrators")
                .arg(Arg::new("enabled").required(true).value_parser(["0", "1"])),
        )
        .get_matches();

    // Load configuration
    let config_file = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or("davtags.toml");

    let config = Config::load(config_file)?;

    // Initialize logging
    let log_level = match config.loglevel() {
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(&config, &matches).await {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
