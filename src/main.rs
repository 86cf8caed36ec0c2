use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use jobfinder::controller::{AuthController, JobDetailController, ListController, ProfileController, Tab, UploadController};
use jobfinder::forms::{CompanyForm, JobForm, SignUpForm, UserForm};
use jobfinder::models::{Company, Job, Ref};
use jobfinder::query::filters::parse_bracket;
use jobfinder::query::{Field, JobType, QueryState, SortOrder, EXPERIENCE_BRACKETS};
use jobfinder::sources::{CompanyDirectory, JobSearch, ListSource};
use jobfinder::{ApiClient, ClientError, Config, SessionStore};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobfinder")]
#[command(about = "Search jobs and companies, post and manage listings on JobFinder")]
struct Cli {
    /// Base URL of the JobFinder API (overrides JOBFINDER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides JOBFINDER_SESSION)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ListArgs {
    /// Search term
    #[arg(short, long)]
    search: Option<String>,

    /// Location
    #[arg(short, long)]
    location: Option<String>,

    /// Sort order (Newest, Oldest, A-Z, Z-A)
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Start from a shared query string, e.g. "search=rust&jtype=Contract"
    #[arg(long)]
    query: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value = "1")]
    pages: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Search job postings
    Jobs {
        #[command(flatten)]
        list: ListArgs,

        /// Job type filter (Full-Time, Part-Time, Contract, Intern); repeatable
        #[arg(short = 't', long = "type")]
        job_types: Vec<JobType>,

        /// Experience bracket by label ("Under 1 Year") or range ("2-6"); repeatable
        #[arg(short, long = "exp")]
        experience: Vec<String>,
    },

    /// Show a job posting
    Job {
        id: String,

        /// Tab to show (description, company)
        #[arg(long, default_value = "description")]
        tab: Tab,
    },

    /// Delete one of your job postings
    DeleteJob { id: String },

    /// Browse companies
    Companies {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show a company page (yours when no id is given)
    Company { id: Option<String> },

    /// Post a job as the logged-in company
    PostJob {
        #[arg(long)]
        title: String,
        #[arg(long = "type", default_value = "Full-Time")]
        job_type: JobType,
        #[arg(long)]
        salary: String,
        #[arg(long)]
        vacancies: String,
        /// Years of experience
        #[arg(long)]
        experience: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        desc: String,
        #[arg(long, default_value = "")]
        requirements: String,
    },

    /// List your company's most recent posts
    RecentPosts,

    /// Create an account
    Register {
        /// Register a company instead of a job seeker
        #[arg(long)]
        company: bool,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        /// Company name
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Log in
    Login {
        /// Log in as a company
        #[arg(long)]
        company: bool,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log out
    Logout {
        /// Also delete the saved session
        #[arg(long)]
        forget: bool,
    },

    /// Show the logged-in account
    Whoami,

    /// Update your seeker profile
    UpdateUser {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        job_title: String,
        #[arg(long)]
        about: String,
    },

    /// Update your company profile
    UpdateCompany {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        about: String,
        #[arg(long)]
        profile_url: Option<String>,
    },
}

/// Keep the detailed error in the log, show the user-facing text
fn surface(e: ClientError) -> anyhow::Error {
    debug!("{:?}", e);
    anyhow!(e.user_message())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to read configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(path) = cli.session {
        config.session_path = path;
    }

    let api = ApiClient::new(&config).context("Failed to create API client")?;
    let session = Arc::new(SessionStore::open(&config.session_path));
    debug!("Using API at {}", api.base_url());

    match cli.command {
        Commands::Jobs { list, job_types, experience } => {
            let mut brackets = Vec::new();
            for label in &experience {
                let bracket = parse_bracket(label).ok_or_else(|| {
                    let known: Vec<&str> = EXPERIENCE_BRACKETS.iter().map(|(l, _)| *l).collect();
                    anyhow!("Unknown experience '{}'; use one of: {}", label, known.join(", "))
                })?;
                brackets.push(bracket);
            }

            let controller = ListController::with_query(JobSearch::new(api), start_query(&list));
            for job_type in job_types {
                controller.edit(|q| q.toggle_job_type(job_type));
            }
            for bracket in brackets {
                controller.edit(|q| q.toggle_experience_bracket(bracket));
            }
            run_list(&controller, &list, print_job).await?;
        }

        Commands::Job { id, tab } => {
            let controller = JobDetailController::new(api, session);
            let mut detail = controller.open(&id).await.map_err(surface)?;
            detail.select(tab);

            let job = &detail.job;
            println!("{} at {}", job.title(), job.company_name());
            println!("   Location: {}", job.location.as_deref().unwrap_or("-"));
            println!(
                "   Salary: $ {}   Type: {}   Applicants: {}   Vacancies: {}",
                job.salary.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                job.job_type.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
                job.applicant_count(),
                job.vacancies.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
            );
            println!();
            println!("[{}]", detail.tab());
            match detail.tab() {
                Tab::Description => {
                    println!("{}", job.description().unwrap_or("No description"));
                    if let Some(requirements) = job.requirements() {
                        println!();
                        println!("Requirements:\n{}", requirements);
                    }
                }
                Tab::Company => {
                    let company = match &job.company {
                        Some(Ref::Full(company)) => company.clone(),
                        Some(Ref::Id(id)) => Company {
                            id: id.clone(),
                            ..Default::default()
                        },
                        None => Company::default(),
                    };
                    print_company_block(&company);
                }
            }
            println!();
            if controller.can_delete(&detail) {
                println!("You posted this job: `jobfinder delete-job {}` removes it.", job.id);
            }
            if !detail.similar().is_empty() {
                println!("Similar jobs:");
                for (i, job) in detail.similar().iter().enumerate() {
                    print_job(i, job);
                }
            }
        }

        Commands::DeleteJob { id } => {
            let controller = JobDetailController::new(api, session);
            let detail = controller.open(&id).await.map_err(surface)?;
            let message = controller.delete(&detail).await.map_err(surface)?;
            println!("{}", message);
        }

        Commands::Companies { list } => {
            let controller = ListController::with_query(CompanyDirectory::new(api), start_query(&list));
            run_list(&controller, &list, print_company).await?;
        }

        Commands::Company { id } => {
            let controller = ProfileController::new(api, session);
            let profile = controller.company(id.as_deref()).await.map_err(surface)?;
            print_company_block(&profile.company);
            let count = profile.company.post_count();
            println!("   {} Job{}", count, if count == 1 { "" } else { "s" });
            if profile.editable {
                println!("   (this is your company: use update-company or post-job)");
            }
            let posts = profile.company.populated_posts();
            for (i, job) in posts.iter().enumerate() {
                print_job(i, job);
            }
            if posts.len() < count {
                println!("   {} more post(s) listed by id only", count - posts.len());
            }
        }

        Commands::PostJob {
            title,
            job_type,
            salary,
            vacancies,
            experience,
            location,
            desc,
            requirements,
        } => {
            let form = JobForm {
                job_title: title,
                job_type,
                salary,
                vacancies,
                experience,
                location,
                desc,
                requirements,
            };
            let controller = UploadController::new(api, session);
            let message = controller.submit(&form).await.map_err(surface)?;
            println!("{}", message);
        }

        Commands::RecentPosts => {
            let controller = UploadController::new(api, session);
            let posts = controller.recent_posts().await.map_err(surface)?;
            if posts.is_empty() {
                println!("No job posts yet");
            }
            for (i, job) in posts.iter().enumerate() {
                print_job(i, job);
            }
        }

        Commands::Register {
            company,
            email,
            password,
            confirm_password,
            first_name,
            last_name,
            name,
        } => {
            let form = SignUpForm {
                register: true,
                company,
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                name,
            };
            let account = AuthController::new(api, session).submit(&form).await.map_err(surface)?;
            println!("Welcome, {}!", account.profile.display_name());
        }

        Commands::Login { company, email, password } => {
            let form = SignUpForm {
                company,
                email,
                password,
                ..Default::default()
            };
            let account = AuthController::new(api, session).submit(&form).await.map_err(surface)?;
            println!("Logged in as {}", account.profile.display_name());
        }

        Commands::Logout { forget } => {
            AuthController::new(api, session.clone()).logout();
            if forget {
                session.forget().map_err(surface)?;
                info!("Removed saved session at {}", config.session_path.display());
            }
            println!("Logged out");
        }

        Commands::Whoami => match session.current() {
            Some(account) => {
                let p = &account.profile;
                println!("{} ({:?})", p.display_name(), account.kind());
                println!("   ID: {}", p.id);
                println!("   Email: {}", p.email.as_deref().unwrap_or("No Email"));
                println!("   Location: {}", p.location.as_deref().unwrap_or("No Location"));
                println!("   Contact: {}", p.contact.as_deref().unwrap_or("No Contact"));
                println!("   About: {}", p.about.as_deref().unwrap_or("No About Found"));
            }
            None => println!("Not logged in"),
        },

        Commands::UpdateUser {
            first_name,
            last_name,
            contact,
            location,
            job_title,
            about,
        } => {
            let form = UserForm {
                first_name,
                last_name,
                contact,
                location,
                job_title,
                about,
                profile_url: None,
            };
            let account = ProfileController::new(api, session)
                .update_user(&form)
                .await
                .map_err(surface)?;
            println!("Updated profile for {}", account.profile.display_name());
        }

        Commands::UpdateCompany {
            name,
            location,
            contact,
            about,
            profile_url,
        } => {
            let form = CompanyForm {
                name,
                location,
                contact,
                about,
                profile_url,
            };
            let account = ProfileController::new(api, session)
                .update_company(&form)
                .await
                .map_err(surface)?;
            println!("Updated company profile for {}", account.profile.display_name());
        }
    }

    Ok(())
}

fn start_query(list: &ListArgs) -> QueryState {
    let mut query = list
        .query
        .as_deref()
        .map(QueryState::deserialize)
        .unwrap_or_default();
    if let Some(search) = &list.search {
        query = query.set_field(Field::Search(search.clone()));
    }
    if let Some(location) = &list.location {
        query = query.set_field(Field::Location(location.clone()));
    }
    if let Some(sort) = list.sort {
        query = query.set_field(Field::Sort(sort));
    }
    query
}

/// One explicit search, then "load more" until `pages` are shown
async fn run_list<S: ListSource>(
    controller: &ListController<S>,
    list: &ListArgs,
    print: fn(usize, &S::Item),
) -> Result<()> {
    controller.search().await.map_err(surface)?;
    for _ in 1..list.pages {
        if !controller.can_load_more() {
            break;
        }
        controller.load_more().await.map_err(surface)?;
    }

    let items = controller.items();
    info!("Showing {} of {} results", items.len(), controller.total_count());
    for (i, item) in items.iter().enumerate() {
        print(i, item);
    }
    if controller.can_load_more() {
        println!("More results available: --pages {}", controller.query().page() + 1);
    }
    let shared = controller.query_string();
    if !shared.is_empty() {
        println!("Query: {}", shared);
    }
    Ok(())
}

fn print_job(i: usize, job: &Job) {
    println!("{}. {} - {}", i + 1, job.title(), job.company_name());
    println!(
        "   {} | {}",
        job.location.as_deref().unwrap_or("No Location"),
        job.job_type.map(|t| t.to_string()).unwrap_or_else(|| "-".into())
    );
    if let Some(posted) = job.created_at {
        println!("   Posted: {}", posted.format("%Y-%m-%d"));
    }
    println!("   ID: {}", job.id);
    println!();
}

fn print_company(i: usize, company: &Company) {
    println!("{}. {}", i + 1, company.name.as_deref().unwrap_or("Unnamed company"));
    println!(
        "   {} | {}",
        company.location.as_deref().unwrap_or("No Location"),
        company.email.as_deref().unwrap_or("No Email")
    );
    println!("   Jobs: {}", company.post_count());
    println!("   ID: {}", company.id);
    println!();
}

fn print_company_block(company: &Company) {
    println!("{}", company.name.as_deref().unwrap_or("Unnamed company"));
    println!("   Location: {}", company.location.as_deref().unwrap_or("No Location"));
    println!("   Email: {}", company.email.as_deref().unwrap_or("No Email"));
    println!("   Contact: {}", company.contact.as_deref().unwrap_or("No Contact"));
    if let Some(about) = &company.about {
        println!();
        println!("{}", about);
    }
}
