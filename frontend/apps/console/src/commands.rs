//! Console command parsing

use auth::RegistrationInput;

pub const HELP: &str = "\
Commands:
  register <email> <password> <given> <family> <phone> <document> <address...>
  confirm <email> <code>          confirm a registration
  resend <email>                  send a new confirmation code
  login <email> <password>        sign in and open your dashboard
  logout                          sign out
  whoami                          show the current session
  open <route>                    navigate (login, client, pricing, guides/new, ...)
  price <origin> <destination> <kg> <value>
  track <guide>                   public shipment tracking
  rate <guide> <1-5> [comment...]
  help                            show this help
  quit | exit";

#[derive(Debug, Clone)]
pub enum Command {
    Register(RegistrationInput),
    Confirm { email: String, code: String },
    Resend { email: String },
    Login { email: String, password: String },
    Logout,
    Whoami,
    Open { route: String },
    Price { origin: String, destination: String, weight_kg: f64, declared_value: f64 },
    Track { guide: String },
    Rate { guide: String, score: u8, comment: Option<String> },
    Help,
    Quit,
    Empty,
}

fn usage(text: &str) -> String {
    format!("usage: {text}")
}

pub fn parse(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(Command::Empty);
    };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("register", [email, password, given, family, phone, document, address @ ..])
            if !address.is_empty() =>
        {
            Command::Register(RegistrationInput {
                email: email.to_string(),
                password: password.to_string(),
                given_name: given.to_string(),
                family_name: family.to_string(),
                phone: phone.to_string(),
                document_id: document.to_string(),
                address: address.join(" "),
            })
        }
        ("register", _) => {
            return Err(usage(
                "register <email> <password> <given> <family> <phone> <document> <address...>",
            ));
        }
        ("confirm", [email, code]) => Command::Confirm {
            email: email.to_string(),
            code: code.to_string(),
        },
        ("confirm", _) => return Err(usage("confirm <email> <code>")),
        ("resend", [email]) => Command::Resend {
            email: email.to_string(),
        },
        ("resend", _) => return Err(usage("resend <email>")),
        ("login", [email, password]) => Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ("login", _) => return Err(usage("login <email> <password>")),
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::Whoami,
        ("open", [route]) => Command::Open {
            route: route.to_string(),
        },
        ("open", _) => return Err(usage("open <route>")),
        ("price", [origin, destination, weight, value]) => Command::Price {
            origin: origin.to_string(),
            destination: destination.to_string(),
            weight_kg: weight
                .parse()
                .map_err(|_| format!("invalid weight: {weight}"))?,
            declared_value: value
                .parse()
                .map_err(|_| format!("invalid declared value: {value}"))?,
        },
        ("price", _) => return Err(usage("price <origin> <destination> <kg> <value>")),
        ("track", [guide]) => Command::Track {
            guide: guide.to_string(),
        },
        ("track", _) => return Err(usage("track <guide>")),
        ("rate", [guide, score, comment @ ..]) => Command::Rate {
            guide: guide.to_string(),
            score: score.parse().map_err(|_| format!("invalid score: {score}"))?,
            comment: (!comment.is_empty()).then(|| comment.join(" ")),
        },
        ("rate", _) => return Err(usage("rate <guide> <1-5> [comment...]")),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(format!("unknown command: {other} (try `help`)")),
    };

    Ok(command)
}
