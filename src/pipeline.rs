use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cmd::{DryRun, Runner, Shell, quote};
use crate::env_file;
use crate::error::ProvisionResult;
use crate::manifest::{self, MANIFESTS};
use crate::nginx;
use crate::prompt::{Prompter, Terminal};
use crate::settings::{Settings, validate_domain};
use crate::vhost::VirtualHost;

/// One step of the provisioning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Domain,
    BasePackages,
    DockerInstall,
    DockerVerify,
    WorkDir,
    Manifests,
    EnvFile,
    NginxConfig,
    NginxService,
    WebRoot,
    VirtualHost,
    EnableSite,
    Firewall,
    NginxReload,
    Certificate,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Self; 15] = [
        Self::Domain,
        Self::BasePackages,
        Self::DockerInstall,
        Self::DockerVerify,
        Self::WorkDir,
        Self::Manifests,
        Self::EnvFile,
        Self::NginxConfig,
        Self::NginxService,
        Self::WebRoot,
        Self::VirtualHost,
        Self::EnableSite,
        Self::Firewall,
        Self::NginxReload,
        Self::Certificate,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Domain => "Collect domain name",
            Self::BasePackages => "Install base packages",
            Self::DockerInstall => "Install Docker",
            Self::DockerVerify => "Verify Docker",
            Self::WorkDir => "Create working directory",
            Self::Manifests => "Download manifests",
            Self::EnvFile => "Set database password",
            Self::NginxConfig => "Raise Nginx upload limit",
            Self::NginxService => "Start Nginx",
            Self::WebRoot => "Create web root",
            Self::VirtualHost => "Write virtual host",
            Self::EnableSite => "Enable site",
            Self::Firewall => "Open firewall ports",
            Self::NginxReload => "Reload Nginx",
            Self::Certificate => "Obtain TLS certificate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

const BASE_PACKAGES: &[&str] = &[
    "sudo apt update -y",
    "sudo apt upgrade -y",
    "sudo apt install vim fail2ban curl openssh-server nginx certbot python3-certbot-nginx -y",
];

const DOCKER_INSTALL: &[&str] = &[
    "sudo apt-get install -y apt-transport-https ca-certificates curl software-properties-common",
    "curl -fsSL https://download.docker.com/linux/ubuntu/gpg | sudo apt-key add -",
    "sudo add-apt-repository \"deb [arch=amd64] https://download.docker.com/linux/ubuntu $(lsb_release -cs) stable\"",
    "sudo apt-get update",
    "sudo apt-get install -y docker-ce docker-ce-cli containerd.io",
];

/// Provisioning run: walks [`Stage::ALL`] in order and stops at
/// the first failure. Completed stages are not rolled back.
pub struct Pipeline {
    settings: Settings,
    runner: Box<dyn Runner>,
    prompter: Box<dyn Prompter>,
    dry_run: bool,
}

impl Pipeline {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            runner: Box::new(Shell),
            prompter: Box::new(Terminal),
            dry_run: false,
        }
    }

    /// Execute commands with `runner`. Cancels an earlier
    /// [`Pipeline::dry_run`].
    #[must_use]
    pub fn runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Box::new(runner);
        self.dry_run = false;
        self
    }

    #[must_use]
    pub fn prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Print commands instead of running them and leave local
    /// files untouched.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self.runner = Box::new(DryRun);
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a stage; later stages
    /// are not attempted.
    pub fn run(&mut self) -> ProvisionResult<()> {
        let mut domain = String::new();

        for stage in Stage::ALL {
            info!(%stage, "starting stage");
            eprintln!("==> {stage}");
            if stage == Stage::Domain {
                domain = self.collect_domain()?;
            } else {
                self.run_stage(stage, &domain)?;
            }
        }

        eprintln!("Setup completed successfully!");
        Ok(())
    }

    fn collect_domain(&mut self) -> ProvisionResult<String> {
        let domain = match &self.settings.domain {
            Some(d) => d.clone(),
            None => self
                .prompter
                .input("Enter your domain name (e.g., me.mooo.com)", None)?,
        };
        let domain = domain.trim().to_string();
        validate_domain(&domain)?;
        Ok(domain)
    }

    fn run_stage(&mut self, stage: Stage, domain: &str) -> ProvisionResult<()> {
        match stage {
            Stage::Domain => Ok(()),
            Stage::BasePackages => self.run_all(BASE_PACKAGES),
            Stage::DockerInstall => self.run_all(DOCKER_INSTALL),
            Stage::DockerVerify => {
                self.runner.run("sudo docker run hello-world")?;
                let version = self.runner.run("docker --version")?;
                println!("{}", version.trim());
                Ok(())
            }
            Stage::WorkDir => self.create_work_dir(),
            Stage::Manifests => self.download_manifests(),
            Stage::EnvFile => self.update_env_file(),
            Stage::NginxConfig => self.patch_nginx_conf(),
            Stage::NginxService => {
                self.runner.run("sudo systemctl start nginx")?;
                self.runner.run("sudo systemctl enable nginx")?;
                let status = self.runner.run("sudo systemctl status nginx")?;
                println!("{}", status.trim_end());
                Ok(())
            }
            Stage::WebRoot => self.create_web_root(domain),
            Stage::VirtualHost => self.write_virtual_host(domain),
            Stage::EnableSite => {
                let available = self.site_available_path(domain);
                let enabled = format!("{}/", self.settings.sites_enabled.trim_end_matches('/'));
                self.runner
                    .run(&format!("sudo ln -s {} {}", quote(&available), quote(&enabled)))?;
                Ok(())
            }
            Stage::Firewall => {
                for port in &self.settings.firewall_ports {
                    self.runner.run(&format!("sudo ufw allow {port}"))?;
                }
                Ok(())
            }
            Stage::NginxReload => {
                self.runner.run("sudo systemctl reload nginx")?;
                Ok(())
            }
            Stage::Certificate => {
                self.runner
                    .run(&format!("sudo certbot --nginx -d {}", quote(domain)))?;
                Ok(())
            }
        }
    }

    fn run_all(&self, commands: &[&str]) -> ProvisionResult<()> {
        for command in commands {
            self.runner.run(command)?;
        }
        Ok(())
    }

    fn create_work_dir(&self) -> ProvisionResult<()> {
        let dir = &self.settings.work_dir;
        if self.dry_run {
            eprintln!("[dry-run] create directory {}", dir.display());
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "working directory ready");
        Ok(())
    }

    fn download_manifests(&self) -> ProvisionResult<()> {
        let dir = &self.settings.work_dir;
        for manifest in &MANIFESTS {
            self.runner
                .run(&manifest.download_command(&self.settings.release_url, dir))?;
        }

        if self.dry_run {
            eprintln!("[dry-run] verify {}", dir.join(manifest::COMPOSE_FILE).display());
            return Ok(());
        }
        let services = manifest::verify_compose(dir)?;
        info!(services = ?services, "compose manifest verified");
        Ok(())
    }

    fn update_env_file(&mut self) -> ProvisionResult<()> {
        let default_dir = self.settings.work_dir.to_string_lossy().to_string();
        if self.dry_run {
            eprintln!(
                "[dry-run] set {} in {}",
                env_file::DB_PASSWORD_KEY,
                Path::new(&default_dir).join(env_file::ENV_FILE_NAME).display()
            );
            return Ok(());
        }

        let dir = self.prompter.input(
            "Enter the path to the directory containing the .env file",
            Some(&default_dir),
        )?;
        env_file::update_db_password(&PathBuf::from(dir), self.prompter.as_mut())
    }

    fn patch_nginx_conf(&self) -> ProvisionResult<()> {
        let s = &self.settings;
        if self.dry_run {
            eprintln!(
                "[dry-run] add '{}' after '{}' in {}",
                s.nginx_directive,
                s.nginx_marker,
                s.nginx_conf.display()
            );
            return Ok(());
        }
        nginx::add_directive(&s.nginx_conf, &s.nginx_marker, &s.nginx_directive)
    }

    fn create_web_root(&self, domain: &str) -> ProvisionResult<()> {
        let web_root = self.settings.web_root.trim_end_matches('/');
        let html = quote(&format!("{web_root}/{domain}/html"));

        self.runner.run(&format!("sudo mkdir -p {html}"))?;
        self.runner
            .run(&format!("sudo chown -R $USER:$USER {html}"))?;
        self.runner
            .run(&format!("sudo chmod -R 755 {}", quote(web_root)))?;
        self.runner.run(&format!(
            "sudo mkdir -p {}",
            quote(&self.settings.sites_available)
        ))?;
        self.runner.run(&format!(
            "sudo mkdir -p {}",
            quote(&self.settings.sites_enabled)
        ))?;
        Ok(())
    }

    fn write_virtual_host(&self, domain: &str) -> ProvisionResult<()> {
        let content = VirtualHost::new(domain)
            .upstream(&self.settings.upstream)
            .client_max_body_size(&self.settings.vhost_max_body_size)
            .render();
        let path = self.site_available_path(domain);

        self.runner.run_with_stdin(
            &format!("sudo tee {} > /dev/null", quote(&path)),
            content.as_bytes(),
        )?;
        info!(%path, "virtual host written");
        Ok(())
    }

    fn site_available_path(&self, domain: &str) -> String {
        format!(
            "{}/{domain}",
            self.settings.sites_available.trim_end_matches('/')
        )
    }
}
