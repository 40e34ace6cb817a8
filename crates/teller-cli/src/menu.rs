//! Menu definitions: numbered entries, labels, and the capability each
//! entry requires.
//!
//! Entries that require a capability the session lacks are still shown;
//! choosing one runs into the engine's gate and the refusal is printed.
//! The menus never hide options, matching the legacy screens.

use teller_auth::Permissions;

/// Top-level menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenu {
    ListClients,
    AddClient,
    RemoveClient,
    UpdateClient,
    FindClient,
    Transactions,
    ManageUsers,
    Logout,
    Exit,
}

impl MainMenu {
    pub const ENTRIES: [Self; 9] = [
        Self::ListClients,
        Self::AddClient,
        Self::RemoveClient,
        Self::UpdateClient,
        Self::FindClient,
        Self::Transactions,
        Self::ManageUsers,
        Self::Logout,
        Self::Exit,
    ];

    /// Maps a 1-based choice to an entry.
    #[must_use]
    pub fn from_choice(choice: u32) -> Option<Self> {
        Self::ENTRIES.get(choice.checked_sub(1)? as usize).copied()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ListClients => "Show Client List",
            Self::AddClient => "Add New Client",
            Self::RemoveClient => "Delete Client",
            Self::UpdateClient => "Update Client Info",
            Self::FindClient => "Find Client",
            Self::Transactions => "Transactions",
            Self::ManageUsers => "Manage Users",
            Self::Logout => "Logout",
            Self::Exit => "Exit",
        }
    }

    /// The capability the entry needs, or `None` for flow control.
    #[must_use]
    pub fn required_permission(self) -> Option<Permissions> {
        match self {
            Self::ListClients => Some(Permissions::LIST_CLIENTS),
            Self::AddClient => Some(Permissions::ADD_CLIENT),
            Self::RemoveClient => Some(Permissions::REMOVE_CLIENT),
            Self::UpdateClient => Some(Permissions::UPDATE_CLIENT),
            Self::FindClient => Some(Permissions::FIND_CLIENT),
            Self::Transactions => Some(Permissions::TRANSACTIONS),
            Self::ManageUsers => Some(Permissions::MANAGE_USERS),
            Self::Logout | Self::Exit => None,
        }
    }
}

/// Transactions sub-menu. Reaching it at all requires
/// [`Permissions::TRANSACTIONS`]. The balances report additionally
/// follows [`Permissions::LIST_CLIENTS`], same as the client list it
/// aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionsMenu {
    Deposit,
    Withdraw,
    TotalBalances,
    MainMenu,
}

impl TransactionsMenu {
    pub const ENTRIES: [Self; 4] = [
        Self::Deposit,
        Self::Withdraw,
        Self::TotalBalances,
        Self::MainMenu,
    ];

    #[must_use]
    pub fn from_choice(choice: u32) -> Option<Self> {
        Self::ENTRIES.get(choice.checked_sub(1)? as usize).copied()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
            Self::TotalBalances => "Total Balances",
            Self::MainMenu => "Main Menu",
        }
    }
}

/// User-management sub-menu. Reaching it requires
/// [`Permissions::MANAGE_USERS`], which also covers every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersMenu {
    ListUsers,
    AddUser,
    RemoveUser,
    UpdateUser,
    FindUser,
    MainMenu,
}

impl UsersMenu {
    pub const ENTRIES: [Self; 6] = [
        Self::ListUsers,
        Self::AddUser,
        Self::RemoveUser,
        Self::UpdateUser,
        Self::FindUser,
        Self::MainMenu,
    ];

    #[must_use]
    pub fn from_choice(choice: u32) -> Option<Self> {
        Self::ENTRIES.get(choice.checked_sub(1)? as usize).copied()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ListUsers => "List Users",
            Self::AddUser => "Add New User",
            Self::RemoveUser => "Delete User",
            Self::UpdateUser => "Update User",
            Self::FindUser => "Find User",
            Self::MainMenu => "Main Menu",
        }
    }
}

impl std::fmt::Display for MainMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for TransactionsMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for UsersMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_choices_are_one_based() {
        assert_eq!(MainMenu::from_choice(1), Some(MainMenu::ListClients));
        assert_eq!(MainMenu::from_choice(9), Some(MainMenu::Exit));
        assert_eq!(MainMenu::from_choice(10), None);
    }

    #[test]
    fn zero_choice_does_not_underflow() {
        assert_eq!(MainMenu::from_choice(0), None);
        assert_eq!(TransactionsMenu::from_choice(0), None);
        assert_eq!(UsersMenu::from_choice(0), None);
    }

    #[test]
    fn every_operational_entry_names_its_capability() {
        for entry in MainMenu::ENTRIES {
            let gated = entry.required_permission().is_some();
            let flow_control = matches!(entry, MainMenu::Logout | MainMenu::Exit);
            assert_ne!(gated, flow_control, "{entry:?}");
        }
    }

    #[test]
    fn sub_menus_round_trip_all_entries() {
        for (i, entry) in TransactionsMenu::ENTRIES.iter().enumerate() {
            assert_eq!(TransactionsMenu::from_choice(i as u32 + 1), Some(*entry));
        }
        for (i, entry) in UsersMenu::ENTRIES.iter().enumerate() {
            assert_eq!(UsersMenu::from_choice(i as u32 + 1), Some(*entry));
        }
    }
}
