//! Interactive screens: login, the main menu, and the two sub-menus.
//!
//! Screens are generic over the streams so the whole interaction can be
//! driven from in-memory buffers in tests. Recoverable operation errors
//! (unknown key, duplicate key, denied gate, bad amount) are printed and
//! the loop continues; only data-integrity failures escape.

use crate::menu::{MainMenu, TransactionsMenu, UsersMenu};
use crate::prompt::{Prompt, PromptError};
use std::io::{BufRead, Write};
use teller_engine::{
    authenticate, Client, ClientOps, ClientUpdate, OpError, Permissions, RemoveOutcome, Session,
    TransactionOutcome, User, UserOps, UserUpdate,
};
use thiserror::Error;
use tracing::debug;

/// Login attempts before the program gives up.
pub const LOGIN_ATTEMPTS: u32 = 3;

/// What the caller should do after a loop returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Drop the session and show the login screen again.
    Logout,
    /// Leave the program.
    Exit,
}

/// Screen-level failures. Everything recoverable is already printed and
/// swallowed before it gets here.
#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Op(#[from] OpError),

    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The interactive console.
pub struct Screens<R, W> {
    prompt: Prompt<R, W>,
    clients: ClientOps,
    users: UserOps,
    currency: String,
}

impl<R: BufRead, W: Write> Screens<R, W> {
    pub fn new(
        prompt: Prompt<R, W>,
        clients: ClientOps,
        users: UserOps,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            prompt,
            clients,
            users,
            currency: currency.into(),
        }
    }

    /// Asks for credentials until a pair matches or the attempts run out.
    ///
    /// Returns `None` when every attempt failed; the caller exits.
    pub fn login(&mut self) -> Result<Option<Session>, UiError> {
        for attempt in 1..=LOGIN_ATTEMPTS {
            writeln!(self.prompt.output(), "\n--- Login ---")?;
            // Garbled credential entry burns an attempt like a wrong pair.
            let Some((username, password)) = self.read_credentials()? else {
                writeln!(
                    self.prompt.output(),
                    "Credentials abandoned ({attempt} of {LOGIN_ATTEMPTS} attempts)"
                )?;
                continue;
            };

            match authenticate(self.users.store(), &username, password) {
                Ok(session) => {
                    writeln!(self.prompt.output(), "Welcome, {}.", session.username())?;
                    return Ok(Some(session));
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    writeln!(
                        self.prompt.output(),
                        "{e} ({attempt} of {LOGIN_ATTEMPTS} attempts)"
                    )?;
                }
            }
        }
        writeln!(self.prompt.output(), "Too many failed logins.")?;
        Ok(None)
    }

    /// One credential pair, or `None` when either field ran out of
    /// retries. EOF and I/O failures still propagate.
    fn read_credentials(&mut self) -> Result<Option<(String, u32)>, UiError> {
        let username = match self.prompt.read_required_text("Username") {
            Ok(username) => username,
            Err(PromptError::RetriesExhausted(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match self.prompt.read_u32("Password") {
            Ok(password) => Ok(Some((username, password))),
            Err(PromptError::RetriesExhausted(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Runs the main menu loop for one session.
    pub fn run(&mut self, session: &Session) -> Result<Flow, UiError> {
        loop {
            self.render_menu(
                "Main Menu",
                &MainMenu::ENTRIES.map(MainMenu::label),
            )?;
            let choice = match self
                .prompt
                .read_choice("Choose", MainMenu::ENTRIES.len() as u32)
            {
                Ok(choice) => choice,
                Err(PromptError::Eof) => return Ok(Flow::Exit),
                Err(e) => return Err(e.into()),
            };
            let Some(entry) = MainMenu::from_choice(choice) else {
                continue;
            };
            debug!(user = session.username(), entry = %entry, "menu choice");

            let result = match entry {
                MainMenu::ListClients => self.list_clients(session),
                MainMenu::AddClient => self.add_client(session),
                MainMenu::RemoveClient => self.remove_client(session),
                MainMenu::UpdateClient => self.update_client(session),
                MainMenu::FindClient => self.find_client(session),
                MainMenu::Transactions => match self.transactions_loop(session)? {
                    Some(flow) => return Ok(flow),
                    None => Ok(()),
                },
                MainMenu::ManageUsers => match self.users_loop(session)? {
                    Some(flow) => return Ok(flow),
                    None => Ok(()),
                },
                MainMenu::Logout => return Ok(Flow::Logout),
                MainMenu::Exit => return Ok(Flow::Exit),
            };

            match result {
                Ok(()) => {}
                Err(UiError::Prompt(PromptError::Eof)) => return Ok(Flow::Exit),
                Err(UiError::Prompt(PromptError::RetriesExhausted(n))) => {
                    writeln!(self.prompt.output(), "Abandoned after {n} invalid entries.")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // --- Client screens ---

    fn list_clients(&mut self, session: &Session) -> Result<(), UiError> {
        let Some(clients) = self.surface(self.clients.list(session))? else {
            return Ok(());
        };

        let out = self.prompt.output();
        writeln!(out, "\nClient List ({} client(s)):", clients.len())?;
        writeln!(
            out,
            "{:<16} {:<24} {:<14} {:>14}",
            "Account", "Name", "Phone", "Balance"
        )?;
        for client in &clients {
            writeln!(
                out,
                "{:<16} {:<24} {:<14} {:>13}{}",
                client.account_number,
                client.name,
                client.phone_number,
                client.balance,
                self.currency
            )?;
        }
        let total: f64 = clients.iter().map(|c| c.balance).sum();
        writeln!(out, "Total balances: {}{total}", self.currency)?;
        Ok(())
    }

    fn add_client(&mut self, session: &Session) -> Result<(), UiError> {
        let mut account = self.prompt.read_required_text("Account Number")?;
        let pin = self.prompt.read_u32("PIN")?;
        let name = self.prompt.read_required_text("Name")?;
        let phone = self.prompt.read_required_text("Phone Number")?;
        let balance = self.prompt.read_non_negative_amount("Opening Balance")?;

        loop {
            let client = Client::new(&account, pin, &name, &phone, balance);
            match self.clients.add(session, client) {
                Ok(()) => {
                    writeln!(self.prompt.output(), "Client '{account}' added.")?;
                    return Ok(());
                }
                // Only the key clashed; re-ask just that field.
                Err(OpError::DuplicateKey(key)) => {
                    writeln!(
                        self.prompt.output(),
                        "A client with account number '{key}' already exists."
                    )?;
                    account = self.prompt.read_required_text("Account Number")?;
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    writeln!(self.prompt.output(), "{e}")?;
                    return Ok(());
                }
            }
        }
    }

    fn find_client(&mut self, session: &Session) -> Result<(), UiError> {
        let account = self.prompt.read_required_text("Account Number")?;
        if let Some(client) = self.surface(self.clients.find(session, &account))? {
            let card = self.client_card(&client);
            writeln!(self.prompt.output(), "{card}")?;
        }
        Ok(())
    }

    fn update_client(&mut self, session: &Session) -> Result<(), UiError> {
        let account = self.prompt.read_required_text("Account Number")?;
        let currency = self.currency.clone();

        let mut prompt_failure = None;
        let result = self.clients.update(session, &account, |current| {
            let _ = writeln!(self.prompt.output(), "{}", client_card(current, &currency));
            match collect_client_update(&mut self.prompt) {
                Ok(update) => Some(update),
                // Abort the update (nothing is written), then resurface.
                Err(e) => {
                    prompt_failure = Some(e);
                    None
                }
            }
        });
        if let Some(e) = prompt_failure {
            return Err(e.into());
        }

        match self.surface(result)? {
            Some(Some(_)) => writeln!(self.prompt.output(), "Client '{account}' updated.")?,
            Some(None) => writeln!(self.prompt.output(), "Update abandoned.")?,
            None => {}
        }
        Ok(())
    }

    fn remove_client(&mut self, session: &Session) -> Result<(), UiError> {
        let account = self.prompt.read_required_text("Account Number")?;
        let currency = self.currency.clone();

        let mut prompt_failure = None;
        let result = self.clients.remove(session, &account, |client| {
            let _ = writeln!(self.prompt.output(), "{}", client_card(client, &currency));
            match self.prompt.confirm("Delete this client?") {
                Ok(answer) => answer,
                // Decline (nothing is written), then resurface.
                Err(e) => {
                    prompt_failure = Some(e);
                    false
                }
            }
        });
        if let Some(e) = prompt_failure {
            return Err(e.into());
        }

        match self.surface(result)? {
            Some(RemoveOutcome::Removed) => {
                writeln!(self.prompt.output(), "Client '{account}' deleted.")?;
            }
            Some(RemoveOutcome::Aborted) => {
                writeln!(self.prompt.output(), "Deletion abandoned.")?;
            }
            None => {}
        }
        Ok(())
    }

    // --- Transactions sub-menu ---

    /// Returns `Some(flow)` when the whole program should move on (EOF),
    /// `None` to fall back to the main menu.
    fn transactions_loop(&mut self, session: &Session) -> Result<Option<Flow>, UiError> {
        // The sub-menu itself is gated; a refusal falls straight back.
        if let Err(e) = session.require(Permissions::TRANSACTIONS, "transactions") {
            writeln!(self.prompt.output(), "{e}")?;
            return Ok(None);
        }

        loop {
            self.render_menu(
                "Transactions",
                &TransactionsMenu::ENTRIES.map(TransactionsMenu::label),
            )?;
            let choice = match self
                .prompt
                .read_choice("Choose", TransactionsMenu::ENTRIES.len() as u32)
            {
                Ok(choice) => choice,
                Err(PromptError::Eof) => return Ok(Some(Flow::Exit)),
                Err(e) => return Err(e.into()),
            };
            let Some(entry) = TransactionsMenu::from_choice(choice) else {
                continue;
            };

            let result = match entry {
                TransactionsMenu::Deposit => self.transact(session, true),
                TransactionsMenu::Withdraw => self.transact(session, false),
                TransactionsMenu::TotalBalances => self.total_balances(session),
                TransactionsMenu::MainMenu => return Ok(None),
            };

            match result {
                Ok(()) => {}
                Err(UiError::Prompt(PromptError::Eof)) => return Ok(Some(Flow::Exit)),
                Err(UiError::Prompt(PromptError::RetriesExhausted(n))) => {
                    writeln!(self.prompt.output(), "Abandoned after {n} invalid entries.")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn transact(&mut self, session: &Session, is_deposit: bool) -> Result<(), UiError> {
        let account = self.prompt.read_required_text("Account Number")?;
        let amount = self.prompt.read_amount("Amount")?;
        let currency = self.currency.clone();

        let mut prompt_failure = None;
        let confirm = |balance: f64| {
            let _ = writeln!(
                self.prompt.output(),
                "Current balance: {currency}{balance}"
            );
            match self.prompt.confirm("Apply this transaction?") {
                Ok(answer) => answer,
                // Decline (nothing is written), then resurface.
                Err(e) => {
                    prompt_failure = Some(e);
                    false
                }
            }
        };
        let result = if is_deposit {
            self.clients.deposit(session, &account, amount, confirm)
        } else {
            self.clients.withdraw(session, &account, amount, confirm)
        };
        if let Some(e) = prompt_failure {
            return Err(e.into());
        }

        match self.surface(result)? {
            Some(TransactionOutcome::Applied { new_balance }) => {
                writeln!(
                    self.prompt.output(),
                    "New balance: {}{new_balance}",
                    self.currency
                )?;
            }
            Some(TransactionOutcome::Aborted) => {
                writeln!(self.prompt.output(), "Transaction abandoned.")?;
            }
            None => {}
        }
        Ok(())
    }

    fn total_balances(&mut self, session: &Session) -> Result<(), UiError> {
        if let Some(total) = self.surface(self.clients.total_balances(session))? {
            writeln!(self.prompt.output(), "Total balances: {}{total}", self.currency)?;
        }
        Ok(())
    }

    // --- User-management sub-menu ---

    fn users_loop(&mut self, session: &Session) -> Result<Option<Flow>, UiError> {
        if let Err(e) = session.require(Permissions::MANAGE_USERS, "manage users") {
            writeln!(self.prompt.output(), "{e}")?;
            return Ok(None);
        }

        loop {
            self.render_menu("Manage Users", &UsersMenu::ENTRIES.map(UsersMenu::label))?;
            let choice = match self
                .prompt
                .read_choice("Choose", UsersMenu::ENTRIES.len() as u32)
            {
                Ok(choice) => choice,
                Err(PromptError::Eof) => return Ok(Some(Flow::Exit)),
                Err(e) => return Err(e.into()),
            };
            let Some(entry) = UsersMenu::from_choice(choice) else {
                continue;
            };

            let result = match entry {
                UsersMenu::ListUsers => self.list_users(session),
                UsersMenu::AddUser => self.add_user(session),
                UsersMenu::RemoveUser => self.remove_user(session),
                UsersMenu::UpdateUser => self.update_user(session),
                UsersMenu::FindUser => self.find_user(session),
                UsersMenu::MainMenu => return Ok(None),
            };

            match result {
                Ok(()) => {}
                Err(UiError::Prompt(PromptError::Eof)) => return Ok(Some(Flow::Exit)),
                Err(UiError::Prompt(PromptError::RetriesExhausted(n))) => {
                    writeln!(self.prompt.output(), "Abandoned after {n} invalid entries.")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn list_users(&mut self, session: &Session) -> Result<(), UiError> {
        let Some(users) = self.surface(self.users.list(session))? else {
            return Ok(());
        };

        let out = self.prompt.output();
        writeln!(out, "\nUser List ({} user(s)):", users.len())?;
        writeln!(out, "{:<16} {}", "Username", "Permissions")?;
        for user in &users {
            writeln!(out, "{:<16} {}", user.username, user.permissions)?;
        }
        Ok(())
    }

    fn add_user(&mut self, session: &Session) -> Result<(), UiError> {
        let mut username = self.prompt.read_required_text("Username")?;
        let password = self.prompt.read_u32("Password")?;
        let permissions = self.collect_permissions()?;

        loop {
            let user = User::new(&username, password, permissions);
            match self.users.add(session, user) {
                Ok(()) => {
                    writeln!(self.prompt.output(), "User '{username}' added.")?;
                    return Ok(());
                }
                Err(OpError::DuplicateKey(key)) => {
                    writeln!(self.prompt.output(), "User '{key}' already exists.")?;
                    username = self.prompt.read_required_text("Username")?;
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    writeln!(self.prompt.output(), "{e}")?;
                    return Ok(());
                }
            }
        }
    }

    fn find_user(&mut self, session: &Session) -> Result<(), UiError> {
        let username = self.prompt.read_required_text("Username")?;
        if let Some(user) = self.surface(self.users.find(session, &username))? {
            writeln!(
                self.prompt.output(),
                "Username    : {}\nPermissions : {}",
                user.username,
                user.permissions
            )?;
        }
        Ok(())
    }

    fn update_user(&mut self, session: &Session) -> Result<(), UiError> {
        let username = self.prompt.read_required_text("Username")?;

        let mut prompt_failure = None;
        let result = self.users.update(session, &username, |current| {
            let _ = writeln!(
                self.prompt.output(),
                "Current permissions: {}",
                current.permissions
            );
            match collect_user_update(&mut self.prompt) {
                Ok(update) => Some(update),
                Err(e) => {
                    prompt_failure = Some(e);
                    None
                }
            }
        });
        if let Some(e) = prompt_failure {
            return Err(e.into());
        }

        match self.surface(result)? {
            Some(Some(_)) => writeln!(self.prompt.output(), "User '{username}' updated.")?,
            Some(None) => writeln!(self.prompt.output(), "Update abandoned.")?,
            None => {}
        }
        Ok(())
    }

    fn remove_user(&mut self, session: &Session) -> Result<(), UiError> {
        let username = self.prompt.read_required_text("Username")?;

        let mut prompt_failure = None;
        let result = self.users.remove(session, &username, |user| {
            let _ = writeln!(
                self.prompt.output(),
                "Username    : {}\nPermissions : {}",
                user.username,
                user.permissions
            );
            match self.prompt.confirm("Delete this user?") {
                Ok(answer) => answer,
                Err(e) => {
                    prompt_failure = Some(e);
                    false
                }
            }
        });
        if let Some(e) = prompt_failure {
            return Err(e.into());
        }

        match self.surface(result)? {
            Some(RemoveOutcome::Removed) => {
                writeln!(self.prompt.output(), "User '{username}' deleted.")?;
            }
            Some(RemoveOutcome::Aborted) => {
                writeln!(self.prompt.output(), "Deletion abandoned.")?;
            }
            None => {}
        }
        Ok(())
    }

    fn collect_permissions(&mut self) -> Result<Permissions, PromptError> {
        if self.prompt.confirm("Grant full access?")? {
            return Ok(Permissions::FULL_ACCESS);
        }
        let mut permissions = Permissions::empty();
        for capability in Permissions::CAPABILITIES {
            if self.prompt.confirm(&format!("Grant {capability}?"))? {
                permissions |= capability;
            }
        }
        Ok(permissions)
    }

    // --- Helpers ---

    /// Prints a recoverable operation error and keeps going; integrity
    /// failures propagate.
    fn surface<T>(&mut self, result: Result<T, OpError>) -> Result<Option<T>, UiError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                writeln!(self.prompt.output(), "{e}")?;
                Ok(None)
            }
        }
    }

    fn render_menu(&mut self, title: &str, labels: &[&str]) -> Result<(), std::io::Error> {
        let out = self.prompt.output();
        writeln!(out, "\n=== {title} ===")?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(out, "  [{}] {label}", i + 1)?;
        }
        Ok(())
    }

    fn client_card(&self, client: &Client) -> String {
        client_card(client, &self.currency)
    }
}

fn client_card(client: &Client, currency: &str) -> String {
    format!(
        "Account Number : {}\nPIN            : {}\nName           : {}\nPhone Number   : {}\nBalance        : {}{}",
        client.account_number, client.pin, client.name, client.phone_number, currency, client.balance
    )
}

fn collect_client_update<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
) -> Result<ClientUpdate, PromptError> {
    Ok(ClientUpdate {
        pin: prompt.read_u32("New PIN")?,
        name: prompt.read_required_text("New Name")?,
        phone_number: prompt.read_required_text("New Phone Number")?,
        balance: prompt.read_non_negative_amount("New Balance")?,
    })
}

fn collect_user_update<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
) -> Result<UserUpdate, PromptError> {
    let password = prompt.read_u32("New Password")?;
    if prompt.confirm("Grant full access?")? {
        return Ok(UserUpdate {
            password,
            permissions: Permissions::FULL_ACCESS,
        });
    }
    let mut permissions = Permissions::empty();
    for capability in Permissions::CAPABILITIES {
        if prompt.confirm(&format!("Grant {capability}?"))? {
            permissions |= capability;
        }
    }
    Ok(UserUpdate {
        password,
        permissions,
    })
}
