use std::fs;

use anyhow::Result;
use argh::FromArgs;
use tracing_subscriber::EnvFilter;
use uia2_client::{Driver, PointF, ScheduledAction, Selector};

/// uiautomator2 automation CLI
#[derive(FromArgs)]
struct Cli {
    /// server base URL
    #[argh(option, default = "String::from(\"http://127.0.0.1:6790/wd/hub\")")]
    url: String,

    /// reuse an existing session instead of opening a new one
    #[argh(option)]
    session: Option<String>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Size(SizeCmd),
    Find(FindCmd),
    Text(TextCmd),
    Rect(RectCmd),
    Click(ClickCmd),
    Clear(ClearCmd),
    SendKeys(SendKeysCmd),
    LongClick(LongClickCmd),
    Drag(DragCmd),
    DragTo(DragToCmd),
    Swipe(SwipeCmd),
    Flick(FlickCmd),
    ScrollTo(ScrollToCmd),
    Screenshot(ScreenshotCmd),
    Schedule(ScheduleCmd),
    History(HistoryCmd),
    Unschedule(UnscheduleCmd),
    Quit(QuitCmd),
}

/// show the device screen size
#[derive(FromArgs)]
#[argh(subcommand, name = "size")]
struct SizeCmd {}

/// list ids of elements matching a selector
#[derive(FromArgs)]
#[argh(subcommand, name = "find")]
struct FindCmd {
    /// selector: "class=<name>" or a UiAutomator expression
    #[argh(positional)]
    selector: String,
}

/// print an element's text
#[derive(FromArgs)]
#[argh(subcommand, name = "text")]
struct TextCmd {
    #[argh(positional)]
    selector: String,
}

/// print an element's bounding rectangle
#[derive(FromArgs)]
#[argh(subcommand, name = "rect")]
struct RectCmd {
    #[argh(positional)]
    selector: String,
}

/// click an element
#[derive(FromArgs)]
#[argh(subcommand, name = "click")]
struct ClickCmd {
    #[argh(positional)]
    selector: String,
}

/// clear an editable element
#[derive(FromArgs)]
#[argh(subcommand, name = "clear")]
struct ClearCmd {
    #[argh(positional)]
    selector: String,
}

/// type text into an element
#[derive(FromArgs)]
#[argh(subcommand, name = "send-keys")]
struct SendKeysCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    text: String,
    /// append instead of replacing existing content
    #[argh(switch)]
    append: bool,
}

/// long-press an element
#[derive(FromArgs)]
#[argh(subcommand, name = "long-click")]
struct LongClickCmd {
    #[argh(positional)]
    selector: String,
    /// press duration in seconds
    #[argh(option)]
    duration: Option<f64>,
}

/// drag an element to absolute screen coordinates
#[derive(FromArgs)]
#[argh(subcommand, name = "drag")]
struct DragCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    x: f64,
    #[argh(positional)]
    y: f64,
    /// drag speed, server default when omitted
    #[argh(option)]
    speed: Option<u32>,
}

/// drag an element onto another element
#[derive(FromArgs)]
#[argh(subcommand, name = "drag-to")]
struct DragToCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    dest: String,
    /// drag speed, server default when omitted
    #[argh(option)]
    speed: Option<u32>,
}

/// swipe inside an element; offsets relative to its top-left corner
#[derive(FromArgs)]
#[argh(subcommand, name = "swipe")]
struct SwipeCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    x1: f64,
    #[argh(positional)]
    y1: f64,
    #[argh(positional)]
    x2: f64,
    #[argh(positional)]
    y2: f64,
    /// swipe speed, server default when omitted
    #[argh(option)]
    speed: Option<u32>,
}

/// fling an element along a vector
#[derive(FromArgs)]
#[argh(subcommand, name = "flick")]
struct FlickCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    dx: i32,
    #[argh(positional)]
    dy: i32,
    /// fling speed, server default when omitted
    #[argh(option, default = "0")]
    speed: i32,
}

/// scroll inside an element until a target selector matches
#[derive(FromArgs)]
#[argh(subcommand, name = "scroll-to")]
struct ScrollToCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    target: String,
    /// swipe budget, server default when omitted
    #[argh(option)]
    max_swipes: Option<i32>,
}

/// save an element screenshot to a file
#[derive(FromArgs)]
#[argh(subcommand, name = "screenshot")]
struct ScreenshotCmd {
    #[argh(positional)]
    selector: String,
    #[argh(positional)]
    path: String,
}

/// register a scheduled action from a JSON definition file
#[derive(FromArgs)]
#[argh(subcommand, name = "schedule")]
struct ScheduleCmd {
    #[argh(positional)]
    file: String,
}

/// print a scheduled action's history as JSON
#[derive(FromArgs)]
#[argh(subcommand, name = "history")]
struct HistoryCmd {
    #[argh(positional)]
    name: String,
}

/// unschedule an action and print its final history as JSON
#[derive(FromArgs)]
#[argh(subcommand, name = "unschedule")]
struct UnscheduleCmd {
    #[argh(positional)]
    name: String,
}

/// end the session
#[derive(FromArgs)]
#[argh(subcommand, name = "quit")]
struct QuitCmd {}

fn parse_selector(raw: &str) -> Selector {
    match raw.strip_prefix("class=") {
        Some(name) => Selector::ClassName(name.to_string()),
        None => Selector::UiAutomator(raw.to_string()),
    }
}

async fn open_driver(cli: &Cli) -> Result<Driver> {
    match &cli.session {
        Some(id) => Ok(Driver::attach(&cli.url, id)),
        None => {
            let driver = Driver::connect(&cli.url).await?;
            eprintln!("note: opened session {}", driver.session_id());
            Ok(driver)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli: Cli = argh::from_env();
    let driver = open_driver(&cli).await?;

    match cli.command {
        Command::Size(_) => {
            let size = driver.device_size().await?;
            println!("{}x{}", size.width, size.height);
        }
        Command::Find(cmd) => {
            let elements = driver.find_elements(&parse_selector(&cmd.selector)).await?;
            for element in &elements {
                println!("{}", element.id());
            }
            eprintln!("note: {} match(es)", elements.len());
        }
        Command::Text(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            println!("{}", element.text().await?);
        }
        Command::Rect(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            let rect = element.rect().await?;
            println!(
                "{},{} {}x{}",
                rect.origin.x, rect.origin.y, rect.size.width, rect.size.height
            );
        }
        Command::Click(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element.click().await?;
        }
        Command::Clear(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element.clear().await?;
        }
        Command::SendKeys(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            let replace = if cmd.append { Some(false) } else { None };
            element.send_keys(&cmd.text, replace).await?;
        }
        Command::LongClick(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element.long_click(cmd.duration).await?;
        }
        Command::Drag(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element
                .drag_float(PointF { x: cmd.x, y: cmd.y }, cmd.speed)
                .await?;
        }
        Command::DragTo(cmd) => {
            let source = driver.find_element(&parse_selector(&cmd.selector)).await?;
            let dest = driver.find_element(&parse_selector(&cmd.dest)).await?;
            source.drag_to(&dest, cmd.speed).await?;
        }
        Command::Swipe(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element
                .swipe_float(
                    PointF {
                        x: cmd.x1,
                        y: cmd.y1,
                    },
                    PointF {
                        x: cmd.x2,
                        y: cmd.y2,
                    },
                    cmd.speed,
                )
                .await?;
        }
        Command::Flick(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element.flick(cmd.dx, cmd.dy, cmd.speed).await?;
        }
        Command::ScrollTo(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            element
                .scroll_to(&parse_selector(&cmd.target), cmd.max_swipes)
                .await?;
        }
        Command::Screenshot(cmd) => {
            let element = driver.find_element(&parse_selector(&cmd.selector)).await?;
            let data = element.screenshot().await?;
            fs::write(&cmd.path, &data)?;
            eprintln!("saved screenshot to {}", cmd.path);
        }
        Command::Schedule(cmd) => {
            let action: ScheduledAction = serde_json::from_str(&fs::read_to_string(&cmd.file)?)?;
            driver.schedule_action(&action).await?;
            eprintln!(
                "note: scheduled {:?} ({} step(s))",
                action.name,
                action.steps.len()
            );
        }
        Command::History(cmd) => {
            let history = driver.action_history(&cmd.name).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        Command::Unschedule(cmd) => {
            let history = driver.unschedule_action(&cmd.name).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        Command::Quit(_) => {
            driver.quit().await?;
        }
    }

    Ok(())
}
