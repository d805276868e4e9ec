use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use color_eyre::Result;
use eyre::eyre;
use dotenv::dotenv;
use getopts::{Matches, Options};
use log::error;
use book_reviews::client::{
  detail::ReviewDetail,
  form::{Field, ReviewForm},
  list::ReviewList,
  ClientError,
  HttpReviewApi,
  ImageFile,
  ReviewApi
};

const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8080";

// Copy pasted this from getopts doc.
fn print_usage(program: &str, opts: Options) {
  let brief = format!(
    "Usage: {} COMMAND [options]\n\n\
    Commands:\n  list\n  show ID\n  add\n  edit ID\n  delete ID",
    program
  );
  print!("{}", opts.usage(&brief));
}

// Every field flag that was given goes through the form,
// which validates it right away like a change event would.
fn apply_flags(form: &mut ReviewForm, matches: &Matches) -> Result<()> {
  let flags = [
    ("title", Field::Title),
    ("author", Field::Author),
    ("rating", Field::Rating),
    ("read-date", Field::ReadDate),
    ("review", Field::Review)
  ];
  for (flag, field) in flags.iter() {
    if let Some(value) = matches.opt_str(flag) {
      form.change(*field, value);
    }
  }
  if let Some(path) = matches.opt_str("image") {
    let image = ImageFile::from_path(Path::new(&path))?;
    if !form.select_image(image) {
      return Err(eyre!(
        form.errors().get("image").unwrap_or("Image rejected").to_string()
      ));
    }
  }
  Ok(())
}

fn confirm(question: &str) -> Result<bool> {
  print!("{} [y/N] ", question);
  io::stdout().flush()?;
  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn parse_id(arg: Option<&String>) -> Result<i64> {
  arg.ok_or_else(|| eyre!("Missing review ID"))?
    .parse::<i64>()
    .map_err(|_| eyre!("Review ID must be a number"))
}

fn run_command(
  api: &HttpReviewApi,
  command: &str,
  args: &[String],
  matches: &Matches
) -> Result<()> {
  match command {
    "list" => {
      println!("{}", ReviewList::load(api).render());
      Ok(())
    },
    "show" => {
      let id = parse_id(args.get(0))?;
      let detail = ReviewDetail::load(api, id)?;
      println!("{}", detail.render());
      Ok(())
    },
    "add" => {
      let mut form = ReviewForm::for_create();
      apply_flags(&mut form, matches)?;
      let created = form.submit(|submission| api.create(&submission))?;
      println!("Book review added successfully! (id {})", created.id);
      Ok(())
    },
    "edit" => {
      let id = parse_id(args.get(0))?;
      let mut form = ReviewForm::for_edit();
      form.populate(&api.get(id)?);
      apply_flags(&mut form, matches)?;
      form.submit(|submission| api.update(id, &submission))?;
      println!("Book review updated successfully!");
      Ok(())
    },
    "delete" => {
      let id = parse_id(args.get(0))?;
      let mut list = ReviewList::load(api);
      if let Some(e) = list.error() {
        println!("{}", e);
        return Ok(());
      }
      if !list.request_delete(id) {
        return Err(ClientError::NotFound.into());
      }
      let confirmed = matches.opt_present("yes")
        || confirm("Are you sure you want to delete this review?")
          .unwrap_or(false);
      if confirmed {
        list.confirm_delete(api)?;
        println!("Book review deleted.");
      } else {
        list.cancel_delete();
        println!("Cancelled.");
      }
      Ok(())
    },
    other => Err(eyre!("Unknown command {}", other))
  }
}

/**
 * Command line front end for the review API.
 */
fn main() -> Result<()> {
  dotenv().ok();
  env_logger::init();
  color_eyre::install()?;

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optopt("u", "api-url", "Base URL of the review API", "URL");
  opts.optopt("t", "title", "Book title", "TITLE");
  opts.optopt("a", "author", "Book author", "AUTHOR");
  opts.optopt("r", "rating", "Rating from 1 to 5", "RATING");
  opts.optopt("d", "read-date", "Date the book was read", "YYYY-MM-DD");
  opts.optopt("w", "review", "Review text", "TEXT");
  opts.optopt("i", "image", "Cover image file", "PATH");
  opts.optflag("y", "yes", "Don't ask before deleting");
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(&args[1..])?;
  if opt_matches.opt_present("h") || opt_matches.free.is_empty() {
    print_usage(&program, opts);
    return Ok(());
  }

  let api_url = opt_matches.opt_str("api-url")
    .or_else(|| env::var("API_URL").ok())
    .unwrap_or_else(|| DEFAULT_API_URL.to_string());
  let api = HttpReviewApi::new(&api_url);

  let command = opt_matches.free[0].clone();
  let rest = &opt_matches.free[1..];
  if let Err(e) = run_command(&api, &command, rest, &opt_matches) {
    error!("Command {} failed - {:?}", command, e);
    // API failures get the friendly message, anything else
    // (bad arguments, unreadable files) is shown as is.
    match e.downcast_ref::<ClientError>() {
      Some(client_error) => eprintln!("{}", client_error.user_message()),
      None => eprintln!("{}", e)
    }
    std::process::exit(1);
  }
  Ok(())
}
